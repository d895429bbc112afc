pub mod api;
pub mod appointment;
pub mod controller;
pub mod dates;
pub mod endpoint;
pub mod error;
pub mod pagination;
pub mod state;
pub mod validation;

pub use api::{execute, filter_by_description, AppointmentApi};
pub use appointment::{Appointment, AppointmentId, AppointmentPatch, ListParams, NewAppointment};
pub use controller::AppointmentController;
pub use endpoint::Endpoint;
pub use error::AppointmentError;
pub use state::{AppointmentState, Request, Response};
