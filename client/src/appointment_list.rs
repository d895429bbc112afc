use seed::{self, prelude::*, *};
use shared::dates::{combine_date_time, current_date, format_date};
use shared::pagination::Pagination;
use shared::validation::Field;
use shared::{Appointment, AppointmentError, AppointmentState, Request, Response};

use crate::fetch_api::FetchApi;
use crate::form::{self, Form};

pub struct Model {
    api: FetchApi,
    pub state: AppointmentState,
    pub pagination: Pagination,
    pub form: Option<Form>,
    pub deleting: Option<Appointment>,
}

impl Model {
    pub fn new(api: FetchApi) -> Self {
        Model {
            api,
            state: AppointmentState::new(),
            pagination: Pagination::default(),
            form: None,
            deleting: None,
        }
    }
}

pub enum Msg {
    Refresh,
    Completed(Result<Response, AppointmentError>),
    SearchChanged(String),
    ClearError,
    PreviousPage,
    NextPage,
    OpenCreate,
    OpenEdit(Appointment),
    FieldChanged(Field, String),
    SubmitForm,
    CloseForm,
    AskDelete(Appointment),
    ConfirmDelete,
    CancelDelete,
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Refresh => submit(model, Request::Refresh, orders),

        Msg::Completed(result) => {
            if let Err(error) = &result {
                error!("appointment request failed:", error.to_string());
            }
            close_modals(model, &result);
            if let Some(next) = model.state.complete(result) {
                dispatch(&model.api, next, orders);
            }
            model.pagination.clamp(model.state.filtered().len());
        }

        Msg::SearchChanged(query) => {
            model.state.set_search_query(query);
            model.pagination.reset();
        }

        Msg::ClearError => model.state.clear_error(),

        Msg::PreviousPage => model.pagination.previous(),

        Msg::NextPage => model.pagination.next(model.state.filtered().len()),

        Msg::OpenCreate => model.form = Some(Form::create()),

        Msg::OpenEdit(appointment) => model.form = Some(Form::edit(&appointment)),

        Msg::FieldChanged(field, value) => {
            if let Some(form) = &mut model.form {
                form.set(field, value);
            }
        }

        Msg::SubmitForm => {
            // an invalid form keeps its errors and sends nothing
            let request = model.form.as_mut().and_then(|form| form.request(current_date()));
            if let Some(request) = request {
                submit(model, request, orders);
            }
        }

        Msg::CloseForm => model.form = None,

        Msg::AskDelete(appointment) => model.deleting = Some(appointment),

        Msg::ConfirmDelete => {
            if let Some(id) = model.deleting.as_ref().map(|appointment| appointment.id) {
                submit(model, Request::Remove(id), orders);
            }
        }

        Msg::CancelDelete => model.deleting = None,
    }
}

/// Modals only close once the store confirmed the change they asked for.
fn close_modals(model: &mut Model, result: &Result<Response, AppointmentError>) {
    match result {
        Ok(Response::Created(_)) | Ok(Response::Updated(_)) => model.form = None,
        Ok(Response::Removed(_)) => model.deleting = None,
        Ok(Response::Refreshed(_)) | Err(_) => {}
    }
}

fn submit(model: &mut Model, request: Request, orders: &mut impl Orders<Msg>) {
    if let Some(request) = model.state.submit(request) {
        dispatch(&model.api, request, orders);
    }
}

fn dispatch(api: &FetchApi, request: Request, orders: &mut impl Orders<Msg>) {
    let api = api.clone();
    orders.perform_cmd(async move { Msg::Completed(shared::execute(&api, &request).await) });
}

pub fn view(model: &Model) -> Vec<Node<Msg>> {
    nodes![
        nav_bar(model),
        error_banner(model),
        search_bar(model),
        appointment_table(model),
        match &model.form {
            Some(form) => form::view(form, model.state.is_loading()),
            None => empty![],
        },
        match &model.deleting {
            Some(appointment) => delete_view(appointment, model.state.is_loading()),
            None => empty![],
        },
    ]
}

fn nav_bar(model: &Model) -> Node<Msg> {
    nav![
        attrs! {At::Class => "navbar navbar-light bg-white border rounded-top mt-1"},
        a!["Appointments", attrs! {At::Class => "navbar-brand"}],
        if model.state.is_loading() {
            div![
                attrs![At::Class => "spinner-border text-secondary"],
                span![attrs![At::Class => "sr-only"], "Loading..."],
            ]
        } else {
            button![
                attrs! {At::Class => "btn btn-primary"},
                ev(Ev::Click, |_| Msg::OpenCreate),
                "New appointment"
            ]
        }
    ]
}

fn error_banner(model: &Model) -> Node<Msg> {
    match model.state.error_message() {
        Some(message) => div![
            attrs! {At::Class => "alert alert-danger mt-1 d-flex justify-content-between"},
            span![message],
            button![
                attrs! {At::Type => "button", At::Class => "btn btn-sm btn-outline-danger"},
                ev(Ev::Click, |_| Msg::ClearError),
                "Close"
            ],
        ],
        None => empty![],
    }
}

fn search_bar(model: &Model) -> Node<Msg> {
    div![
        attrs! {At::Class => "input-group mt-1"},
        input![
            input_ev(Ev::Input, Msg::SearchChanged),
            attrs! {
                At::Value => model.state.search_query(),
                At::Type => "search",
                At::Class => "form-control",
                At::Placeholder => "Search by description...",
                At::Disabled => model.state.is_loading().as_at_value(),
            },
        ],
    ]
}

fn appointment_table(model: &Model) -> Node<Msg> {
    if model.state.is_loading() {
        return div![
            attrs! {At::Class => "text-center text-secondary py-4"},
            "Loading appointments..."
        ];
    }

    let filtered = model.state.filtered();
    if filtered.is_empty() {
        return div![
            attrs! {At::Class => "text-center text-secondary py-4"},
            p!["No appointments found"],
            p![
                attrs! {At::Class => "small"},
                "Click \"New appointment\" to create the first one"
            ],
        ];
    }

    let pagination = &model.pagination;
    let total_pages = pagination.total_pages(filtered.len());

    div![
        table![
            attrs! {At::Class => "table table-hover bg-white border mt-1"},
            thead![tr![
                th!["Description"],
                th!["Date"],
                th!["Time"],
                th!["Responsible"],
                th!["Actions"],
            ]],
            tbody![pagination
                .slice(&filtered)
                .iter()
                .map(|appointment| appointment_row(appointment))],
        ],
        div![
            attrs! {At::Class => "d-flex justify-content-between align-items-center"},
            button![
                attrs! {
                    At::Class => "btn btn-light",
                    At::Disabled => (!pagination.has_previous()).as_at_value(),
                },
                ev(Ev::Click, |_| Msg::PreviousPage),
                "Previous"
            ],
            span![
                attrs! {At::Class => "small text-secondary"},
                format!("Page {} of {}", pagination.page(), total_pages)
            ],
            button![
                attrs! {
                    At::Class => "btn btn-light",
                    At::Disabled => (!pagination.has_next(filtered.len())).as_at_value(),
                },
                ev(Ev::Click, |_| Msg::NextPage),
                "Next"
            ],
        ],
    ]
}

fn appointment_row(appointment: &Appointment) -> Node<Msg> {
    let to_edit = appointment.clone();
    let to_delete = appointment.clone();

    tr![
        td![&appointment.description],
        td![format_date(&appointment.date)],
        td![&appointment.time],
        td![&appointment.responsible],
        td![
            button![
                attrs! {At::Class => "btn btn-sm btn-secondary mr-1"},
                ev(Ev::Click, move |_| Msg::OpenEdit(to_edit)),
                "Edit"
            ],
            button![
                attrs! {At::Class => "btn btn-sm btn-danger"},
                ev(Ev::Click, move |_| Msg::AskDelete(to_delete)),
                "Delete"
            ],
        ],
    ]
}

fn when(appointment: &Appointment) -> String {
    match combine_date_time(&appointment.date, &appointment.time) {
        Some(at) => at.format("%d/%m/%Y at %H:%M").to_string(),
        None => format!("{} {}", format_date(&appointment.date), appointment.time),
    }
}

fn delete_view(appointment: &Appointment, loading: bool) -> Node<Msg> {
    div![
        attrs! {At::Class => "modal d-block", At::TabIndex => "-1"},
        div![
            attrs! {At::Class => "modal-dialog modal-sm"},
            div![
                attrs! {At::Class => "modal-content"},
                div![
                    attrs! {At::Class => "modal-header"},
                    h5![attrs! {At::Class => "modal-title"}, "Confirm deletion"],
                ],
                div![
                    attrs! {At::Class => "modal-body"},
                    p!["Delete this appointment? This cannot be undone."],
                    ul![
                        attrs! {At::Class => "list-unstyled small"},
                        li![format!("Description: {}", appointment.description)],
                        li![format!("When: {}", when(appointment))],
                        li![format!("Responsible: {}", appointment.responsible)],
                    ],
                ],
                div![
                    attrs! {At::Class => "modal-footer"},
                    button![
                        attrs! {At::Class => "btn btn-secondary"},
                        ev(Ev::Click, |_| Msg::CancelDelete),
                        "Cancel"
                    ],
                    button![
                        attrs! {
                            At::Class => "btn btn-danger",
                            At::Disabled => loading.as_at_value(),
                        },
                        ev(Ev::Click, |_| Msg::ConfirmDelete),
                        "Delete"
                    ],
                ],
            ],
        ],
    ]
}
