use tracing::debug;

use crate::api::{self, AppointmentApi};
use crate::appointment::{Appointment, AppointmentId, AppointmentPatch, NewAppointment};
use crate::error::AppointmentError;
use crate::state::{AppointmentState, Request, Response};

/// Owns the appointment state and talks to the store on its behalf.
///
/// Every operation borrows the controller mutably, so one request is in
/// flight at a time and completions apply in the order they were issued.
pub struct AppointmentController<A> {
    api: A,
    state: AppointmentState,
}

impl<A: AppointmentApi> AppointmentController<A> {
    /// Builds the controller and loads the collection once.
    pub async fn new(api: A) -> Self {
        let mut controller = AppointmentController {
            api,
            state: AppointmentState::new(),
        };
        controller.refresh().await;
        controller
    }

    pub fn state(&self) -> &AppointmentState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn filtered_view(&self) -> Vec<&Appointment> {
        self.state.filtered()
    }

    /// Reloads the collection. Failures end up in the state's error and are
    /// not returned.
    pub async fn refresh(&mut self) {
        let _ = self.run(Request::Refresh).await;
    }

    pub async fn create(&mut self, new: NewAppointment) -> Result<Appointment, AppointmentError> {
        match self.run(Request::Create(new)).await? {
            Response::Created(appointment) => Ok(appointment),
            other => Err(unexpected(other)),
        }
    }

    pub async fn update(&mut self, patch: AppointmentPatch) -> Result<Appointment, AppointmentError> {
        match self.run(Request::Update(patch)).await? {
            Response::Updated(appointment) => Ok(appointment),
            other => Err(unexpected(other)),
        }
    }

    pub async fn remove(&mut self, id: AppointmentId) -> Result<(), AppointmentError> {
        match self.run(Request::Remove(id)).await? {
            Response::Removed(_) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.set_search_query(query);
    }

    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    async fn run(&mut self, request: Request) -> Result<Response, AppointmentError> {
        let mut next = self.state.submit(request);
        let mut last = None;
        // the queue is empty between calls, so this runs exactly once
        while let Some(request) = next {
            let result = api::execute(&self.api, &request).await;
            debug!(ok = result.is_ok(), "appointment request completed");
            next = self.state.complete(result.clone());
            last = Some(result);
        }
        last.unwrap_or_else(|| {
            Err(AppointmentError::InvalidResponse(
                "request was not dispatched".to_string(),
            ))
        })
    }
}

fn unexpected(response: Response) -> AppointmentError {
    AppointmentError::InvalidResponse(format!("unexpected response {:?}", response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::ListParams;
    use crate::dates::current_date_string;
    use async_trait::async_trait;
    use std::cell::{Cell, RefCell};

    /// In-memory store with switchable failures.
    #[derive(Default)]
    struct FakeApi {
        records: RefCell<Vec<Appointment>>,
        next_id: Cell<AppointmentId>,
        failure: RefCell<Option<AppointmentError>>,
        calls: Cell<usize>,
    }

    impl FakeApi {
        fn with(records: Vec<Appointment>) -> Self {
            let next_id = records.iter().map(|a| a.id).max().unwrap_or(0) + 1;
            FakeApi {
                records: RefCell::new(records),
                next_id: Cell::new(next_id),
                ..Default::default()
            }
        }

        fn fail_with(&self, error: AppointmentError) {
            *self.failure.borrow_mut() = Some(error);
        }

        fn recover(&self) {
            *self.failure.borrow_mut() = None;
        }

        fn call(&self) -> Result<(), AppointmentError> {
            self.calls.set(self.calls.get() + 1);
            match self.failure.borrow().clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    #[async_trait(?Send)]
    impl AppointmentApi for FakeApi {
        async fn list(&self, _params: &ListParams) -> Result<Vec<Appointment>, AppointmentError> {
            self.call()?;
            Ok(self.records.borrow().clone())
        }

        async fn get(&self, id: AppointmentId) -> Result<Appointment, AppointmentError> {
            self.call()?;
            self.records
                .borrow()
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or(AppointmentError::NotFound { id })
        }

        async fn create(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError> {
            self.call()?;
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let appointment = new.clone().with_id(id);
            self.records.borrow_mut().push(appointment.clone());
            Ok(appointment)
        }

        async fn update(&self, patch: &AppointmentPatch) -> Result<Appointment, AppointmentError> {
            self.call()?;
            let mut records = self.records.borrow_mut();
            let record = records
                .iter_mut()
                .find(|a| a.id == patch.id)
                .ok_or(AppointmentError::NotFound { id: patch.id })?;
            patch.apply_to(record);
            Ok(record.clone())
        }

        async fn remove(&self, id: AppointmentId) -> Result<(), AppointmentError> {
            self.call()?;
            let mut records = self.records.borrow_mut();
            let before = records.len();
            records.retain(|a| a.id != id);
            if records.len() == before {
                return Err(AppointmentError::NotFound { id });
            }
            Ok(())
        }
    }

    fn appointment(id: AppointmentId, description: &str) -> Appointment {
        Appointment {
            id,
            description: description.to_string(),
            date: "2030-03-04".to_string(),
            time: "11:00".to_string(),
            responsible: "Robin".to_string(),
        }
    }

    fn seeded() -> FakeApi {
        FakeApi::with(vec![
            appointment(1, "Kickoff"),
            appointment(7, "Budget review"),
            appointment(9, "Kickoff follow-up"),
        ])
    }

    fn ids<A: AppointmentApi>(controller: &AppointmentController<A>) -> Vec<AppointmentId> {
        controller.state().appointments().iter().map(|a| a.id).collect()
    }

    #[tokio::test]
    async fn loads_once_on_creation() {
        let controller = AppointmentController::new(seeded()).await;
        assert_eq!(ids(&controller), vec![1, 7, 9]);
        assert_eq!(controller.api().calls.get(), 1);
        assert!(!controller.state().is_loading());
        assert_eq!(controller.state().error(), None);
    }

    #[tokio::test]
    async fn failed_load_is_absorbed() {
        let api = seeded();
        api.fail_with(AppointmentError::Network("connection refused".to_string()));
        let mut controller = AppointmentController::new(api).await;
        assert!(ids(&controller).is_empty());
        assert_eq!(
            controller.state().error_message().as_deref(),
            Some("Network error: connection refused")
        );

        controller.api().recover();
        controller.refresh().await;
        assert_eq!(ids(&controller), vec![1, 7, 9]);
        assert_eq!(controller.state().error(), None);
    }

    #[tokio::test]
    async fn create_appends_with_store_id() {
        let mut controller = AppointmentController::new(seeded()).await;
        let new = NewAppointment {
            description: "Standup".to_string(),
            date: current_date_string(),
            time: "09:00".to_string(),
            responsible: "Alex".to_string(),
        };

        let created = controller.create(new.clone()).await.unwrap();
        assert!(created.id > 0);
        assert!(![1, 7, 9].contains(&created.id));
        assert_eq!(created.description, new.description);
        assert_eq!(created.date, new.date);
        assert_eq!(created.time, new.time);
        assert_eq!(created.responsible, new.responsible);

        let all = controller.state().appointments();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last(), Some(&created));
    }

    #[tokio::test]
    async fn update_keeps_position_and_untouched_fields() {
        let mut controller = AppointmentController::new(seeded()).await;
        let updated = controller
            .update(AppointmentPatch::new(1).description("Renamed"))
            .await
            .unwrap();

        assert_eq!(updated.description, "Renamed");
        assert_eq!(updated.date, "2030-03-04");
        assert_eq!(updated.time, "11:00");
        assert_eq!(updated.responsible, "Robin");
        assert_eq!(ids(&controller), vec![1, 7, 9]);
        assert_eq!(controller.state().appointments()[0], updated);
    }

    #[tokio::test]
    async fn remove_drops_exactly_one() {
        let mut controller = AppointmentController::new(seeded()).await;
        controller.remove(7).await.unwrap();
        assert_eq!(ids(&controller), vec![1, 9]);
    }

    #[tokio::test]
    async fn failed_remove_is_reported_and_kept() {
        let mut controller = AppointmentController::new(seeded()).await;
        controller
            .api()
            .fail_with(AppointmentError::RequestFailed { status: 500 });

        let result = controller.remove(7).await;
        assert_eq!(result, Err(AppointmentError::RequestFailed { status: 500 }));
        assert!(ids(&controller).contains(&7));
        assert_eq!(
            controller.state().error(),
            Some(&AppointmentError::RequestFailed { status: 500 })
        );
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn stale_ids_surface_not_found() {
        let mut controller = AppointmentController::new(seeded()).await;
        let result = controller.update(AppointmentPatch::new(42).time("08:00")).await;
        assert_eq!(result, Err(AppointmentError::NotFound { id: 42 }));
        assert_eq!(ids(&controller), vec![1, 7, 9]);
    }

    #[tokio::test]
    async fn next_success_clears_the_error() {
        let mut controller = AppointmentController::new(seeded()).await;
        controller
            .api()
            .fail_with(AppointmentError::Network("timeout".to_string()));
        assert!(controller.remove(1).await.is_err());
        assert!(controller.state().error().is_some());

        controller.api().recover();
        controller.remove(1).await.unwrap();
        assert_eq!(controller.state().error(), None);
    }

    #[tokio::test]
    async fn search_narrows_the_view() {
        let mut controller = AppointmentController::new(seeded()).await;
        controller.set_search_query("KICKOFF");
        let view: Vec<_> = controller.filtered_view().iter().map(|a| a.id).collect();
        assert_eq!(view, vec![1, 9]);

        controller.remove(1).await.unwrap();
        let view: Vec<_> = controller.filtered_view().iter().map(|a| a.id).collect();
        assert_eq!(view, vec![9]);
    }

    #[tokio::test]
    async fn clear_error_needs_no_request() {
        let api = seeded();
        api.fail_with(AppointmentError::RequestFailed { status: 502 });
        let mut controller = AppointmentController::new(api).await;
        let calls = controller.api().calls.get();

        controller.clear_error();
        assert_eq!(controller.state().error(), None);
        assert_eq!(controller.api().calls.get(), calls);
    }
}
