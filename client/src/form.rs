use seed::{prelude::*, *};
use shared::dates::current_date_string;
use shared::validation::{self, AppointmentForm, Field, ValidationErrors};
use shared::{Appointment, AppointmentId, AppointmentPatch, Request};

use crate::appointment_list::Msg;

/// State of the create/edit modal.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub editing: Option<AppointmentId>,
    pub fields: AppointmentForm,
    pub errors: ValidationErrors,
}

impl Form {
    /// Empty form for a new appointment, dated today.
    pub fn create() -> Self {
        Form {
            editing: None,
            fields: AppointmentForm {
                date: current_date_string(),
                ..Default::default()
            },
            errors: ValidationErrors::default(),
        }
    }

    pub fn edit(appointment: &Appointment) -> Self {
        Form {
            editing: Some(appointment.id),
            fields: AppointmentForm::from(appointment),
            errors: ValidationErrors::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.editing {
            Some(_) => "Edit appointment",
            None => "New appointment",
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Description => self.fields.description = value,
            Field::Date => self.fields.date = value,
            Field::Time => self.fields.time = value,
            Field::Responsible => self.fields.responsible = value,
        }
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.fields.description,
            Field::Date => &self.fields.date,
            Field::Time => &self.fields.time,
            Field::Responsible => &self.fields.responsible,
        }
    }

    /// Validates the fields and turns them into the request to submit.
    /// Errors are kept on the form for display.
    pub fn request(&mut self, today: chrono::NaiveDate) -> Option<Request> {
        match validation::validate(&self.fields, today) {
            Ok(new) => {
                self.errors = ValidationErrors::default();
                Some(match self.editing {
                    Some(id) => Request::Update(AppointmentPatch::replace(id, new)),
                    None => Request::Create(new),
                })
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }
}

fn input_type(field: Field) -> &'static str {
    match field {
        Field::Date => "date",
        Field::Time => "time",
        _ => "text",
    }
}

fn form_field(form: &Form, field: Field, loading: bool) -> Node<Msg> {
    let error = form.errors.for_field(field);
    let class = if error.is_some() {
        "form-control is-invalid"
    } else {
        "form-control"
    };

    div![
        attrs! {At::Class => "form-group"},
        label![format!("{} *", field)],
        input![
            input_ev(Ev::Input, move |value| Msg::FieldChanged(field, value)),
            attrs! {
                At::Type => input_type(field),
                At::Class => class,
                At::Value => form.value(field),
                At::Disabled => loading.as_at_value(),
            },
        ],
        match error {
            Some(error) => div![attrs! {At::Class => "invalid-feedback d-block"}, error.to_string()],
            None => empty![],
        },
    ]
}

pub fn view(form: &Form, loading: bool) -> Node<Msg> {
    let submit_label = match form.editing {
        Some(_) => "Save",
        None => "Create",
    };

    div![
        attrs! {At::Class => "modal d-block", At::TabIndex => "-1"},
        div![
            attrs! {At::Class => "modal-dialog"},
            div![
                attrs! {At::Class => "modal-content"},
                div![
                    attrs! {At::Class => "modal-header"},
                    h5![attrs! {At::Class => "modal-title"}, form.title()],
                ],
                form![
                    ev(Ev::Submit, |event| {
                        event.prevent_default();
                        Msg::SubmitForm
                    }),
                    div![
                        attrs! {At::Class => "modal-body"},
                        form_field(form, Field::Description, loading),
                        form_field(form, Field::Date, loading),
                        form_field(form, Field::Time, loading),
                        form_field(form, Field::Responsible, loading),
                    ],
                    div![
                        attrs! {At::Class => "modal-footer"},
                        button![
                            attrs! {At::Type => "button", At::Class => "btn btn-secondary"},
                            ev(Ev::Click, |_| Msg::CloseForm),
                            "Cancel"
                        ],
                        button![
                            attrs! {
                                At::Type => "submit",
                                At::Class => "btn btn-primary",
                                At::Disabled => loading.as_at_value(),
                            },
                            submit_label
                        ],
                    ],
                ],
            ],
        ],
    ]
}
