//! Client-side copy of the appointment collection.
//!
//! All changes go through [`AppointmentState::submit`] and
//! [`AppointmentState::complete`]. Requests are queued and handed out one at
//! a time, so completions can never race each other.

use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::api::filter_by_description;
use crate::appointment::{Appointment, AppointmentId, AppointmentPatch, NewAppointment};
use crate::error::AppointmentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Refresh,
    Create(NewAppointment),
    Update(AppointmentPatch),
    Remove(AppointmentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Refreshed(Vec<Appointment>),
    Created(Appointment),
    Updated(Appointment),
    Removed(AppointmentId),
}

#[derive(Debug, Default)]
pub struct AppointmentState {
    appointments: Vec<Appointment>,
    is_loading: bool,
    error: Option<AppointmentError>,
    search_query: String,
    in_flight: Option<Request>,
    pending: VecDeque<Request>,
}

impl AppointmentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&AppointmentError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| error.to_string())
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn in_flight(&self) -> Option<&Request> {
        self.in_flight.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// The collection narrowed to the active search query. Always computed
    /// from the current inputs.
    pub fn filtered(&self) -> Vec<&Appointment> {
        filter_by_description(&self.appointments, &self.search_query)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Queues `request`. Returns it back when it should be dispatched right
    /// away, `None` when it waits behind the request in flight.
    pub fn submit(&mut self, request: Request) -> Option<Request> {
        self.pending.push_back(request);
        if self.in_flight.is_some() {
            debug!(queued = self.pending.len(), "appointment request queued");
            return None;
        }
        self.start_next(true)
    }

    /// Applies the result of the request in flight and returns the next
    /// request to dispatch, if any.
    pub fn complete(&mut self, result: Result<Response, AppointmentError>) -> Option<Request> {
        let request = match self.in_flight.take() {
            Some(request) => request,
            None => {
                warn!("appointment response without a request in flight, ignoring");
                return None;
            }
        };

        // a failure stays visible while the queue drains behind it
        let succeeded = match result {
            Ok(response) => {
                self.apply(&request, response);
                true
            }
            Err(error) => {
                warn!(?request, %error, "appointment request failed");
                self.error = Some(error);
                false
            }
        };

        self.start_next(succeeded)
    }

    fn start_next(&mut self, clear_error: bool) -> Option<Request> {
        match self.pending.pop_front() {
            Some(request) => {
                self.is_loading = true;
                if clear_error {
                    self.error = None;
                }
                self.in_flight = Some(request.clone());
                Some(request)
            }
            None => {
                self.is_loading = false;
                None
            }
        }
    }

    fn apply(&mut self, request: &Request, response: Response) {
        match response {
            Response::Refreshed(appointments) => {
                let mut unique: Vec<Appointment> = Vec::with_capacity(appointments.len());
                for appointment in appointments {
                    if unique.iter().any(|a| a.id == appointment.id) {
                        warn!(id = appointment.id, "duplicate appointment id in listing, keeping the first");
                        continue;
                    }
                    unique.push(appointment);
                }
                self.appointments = unique;
            }
            Response::Created(appointment) => {
                match self.appointments.iter_mut().find(|a| a.id == appointment.id) {
                    Some(existing) => {
                        warn!(id = appointment.id, "created appointment already cached, replacing");
                        *existing = appointment;
                    }
                    None => self.appointments.push(appointment),
                }
            }
            Response::Updated(appointment) => {
                let id = match request {
                    Request::Update(patch) => patch.id,
                    _ => appointment.id,
                };
                let index = match self.appointments.iter().position(|a| a.id == id) {
                    Some(index) => index,
                    None => {
                        warn!(id, "updated appointment is not cached");
                        return;
                    }
                };
                let returned = appointment.id;
                self.appointments[index] = appointment;
                if returned != id {
                    warn!(id, returned, "updated appointment came back under another id, dropping stale copies");
                    let mut position = 0;
                    self.appointments.retain(|a| {
                        let keep = position == index || a.id != returned;
                        position += 1;
                        keep
                    });
                }
            }
            Response::Removed(id) => self.appointments.retain(|a| a.id != id),
        }
    }
}
