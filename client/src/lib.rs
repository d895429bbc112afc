use seed::{prelude::*, *};

mod appointment_list;
mod fetch_api;
mod form;

use fetch_api::FetchApi;

/// Appointment store base url, fixed at build time.
const API_BASE_URL: &str = match option_env!("APPOINTMENTS_API_URL") {
    Some(url) => url,
    None => "http://localhost:3001",
};

// ------ ------
//     Init
// ------ ------

fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    log!("appointment store at", API_BASE_URL);
    orders.send_msg(Msg::AppointmentList(appointment_list::Msg::Refresh));
    Model {
        appointment_list: appointment_list::Model::new(FetchApi::new(API_BASE_URL)),
    }
}

// ------ ------
//     Model
// ------ ------

struct Model {
    appointment_list: appointment_list::Model,
}

// ------ ------
//    Update
// ------ ------

enum Msg {
    AppointmentList(appointment_list::Msg),
}

fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::AppointmentList(msg) => {
            appointment_list::update(
                msg,
                &mut model.appointment_list,
                &mut orders.proxy(Msg::AppointmentList),
            );
        }
    }
}

// ------ ------
//     View
// ------ ------

fn view(model: &Model) -> impl IntoNodes<Msg> {
    div![
        style! {
            St::FontFamily => "sans-serif";
            St::MaxWidth => px(900);
            St::Margin => "auto";
        },
        appointment_list::view(&model.appointment_list).map_msg(Msg::AppointmentList),
    ]
}

// ------ ------
//     Start
// ------ ------

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}
