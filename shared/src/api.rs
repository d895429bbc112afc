use async_trait::async_trait;
use tracing::debug;

use crate::appointment::{Appointment, AppointmentId, AppointmentPatch, ListParams, NewAppointment};
use crate::error::AppointmentError;
use crate::state::{Request, Response};

/// The appointment store as seen from the client. Every call is exactly one
/// round trip: no retries, no caching.
#[async_trait(?Send)]
pub trait AppointmentApi {
    async fn list(&self, params: &ListParams) -> Result<Vec<Appointment>, AppointmentError>;

    async fn get(&self, id: AppointmentId) -> Result<Appointment, AppointmentError>;

    async fn create(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError>;

    /// `patch.id` selects the record; the full updated record comes back.
    async fn update(&self, patch: &AppointmentPatch) -> Result<Appointment, AppointmentError>;

    async fn remove(&self, id: AppointmentId) -> Result<(), AppointmentError>;
}

/// Runs a controller request against the store.
pub async fn execute<A>(api: &A, request: &Request) -> Result<Response, AppointmentError>
where
    A: AppointmentApi + ?Sized,
{
    debug!(?request, "dispatching appointment request");
    match request {
        Request::Refresh => api.list(&ListParams::default()).await.map(Response::Refreshed),
        Request::Create(new) => api.create(new).await.map(Response::Created),
        Request::Update(patch) => api.update(patch).await.map(Response::Updated),
        Request::Remove(id) => api.remove(*id).await.map(|_| Response::Removed(*id)),
    }
}

/// Case-insensitive substring match on the description, keeping order. A
/// blank query selects everything.
pub fn filter_by_description<'a>(appointments: &'a [Appointment], query: &str) -> Vec<&'a Appointment> {
    if query.trim().is_empty() {
        return appointments.iter().collect();
    }

    let needle = query.to_lowercase();
    appointments
        .iter()
        .filter(|appointment| appointment.description.to_lowercase().contains(&needle))
        .collect()
}
