use thiserror::Error;

use crate::appointment::AppointmentId;
use crate::validation::ValidationErrors;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("Invalid appointment: {0}")]
    Validation(ValidationErrors),
    #[error("Appointment {id} not found")]
    NotFound { id: AppointmentId },
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response from the appointment store: {0}")]
    InvalidResponse(String),
}

impl From<ValidationErrors> for AppointmentError {
    fn from(errors: ValidationErrors) -> Self {
        AppointmentError::Validation(errors)
    }
}
