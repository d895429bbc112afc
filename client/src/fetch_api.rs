use async_trait::async_trait;
use seed::browser::fetch::{FetchError, Method, Request, Response};
use shared::endpoint::check_status;
use shared::{
    Appointment, AppointmentApi, AppointmentError, AppointmentId, AppointmentPatch, Endpoint,
    ListParams, NewAppointment,
};

/// Appointment store reached through the browser's fetch.
#[derive(Debug, Clone)]
pub struct FetchApi {
    endpoint: Endpoint,
}

impl FetchApi {
    pub fn new(base: &str) -> Self {
        FetchApi {
            endpoint: Endpoint::new(base),
        }
    }
}

fn fetch_error(error: FetchError) -> AppointmentError {
    match error {
        FetchError::JsonError(e) => AppointmentError::InvalidResponse(format!("{:?}", e)),
        FetchError::StatusError(status) => AppointmentError::RequestFailed {
            status: status.code,
        },
        other => AppointmentError::Network(format!("{:?}", other)),
    }
}

async fn send(request: Request<'_>, target: Option<AppointmentId>) -> Result<Response, AppointmentError> {
    let response = request.fetch().await.map_err(fetch_error)?;
    check_status(response.status().code, target)?;
    Ok(response)
}

#[async_trait(?Send)]
impl AppointmentApi for FetchApi {
    async fn list(&self, params: &ListParams) -> Result<Vec<Appointment>, AppointmentError> {
        let request = Request::new(self.endpoint.list_url(params)).method(Method::Get);
        send(request, None)
            .await?
            .json()
            .await
            .map_err(fetch_error)
    }

    async fn get(&self, id: AppointmentId) -> Result<Appointment, AppointmentError> {
        let request = Request::new(self.endpoint.item_url(id)).method(Method::Get);
        send(request, Some(id))
            .await?
            .json()
            .await
            .map_err(fetch_error)
    }

    async fn create(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError> {
        let request = Request::new(self.endpoint.collection_url())
            .method(Method::Post)
            .json(new)
            .map_err(fetch_error)?;
        send(request, None)
            .await?
            .json()
            .await
            .map_err(fetch_error)
    }

    async fn update(&self, patch: &AppointmentPatch) -> Result<Appointment, AppointmentError> {
        let request = Request::new(self.endpoint.item_url(patch.id))
            .method(Method::Put)
            .json(patch)
            .map_err(fetch_error)?;
        send(request, Some(patch.id))
            .await?
            .json()
            .await
            .map_err(fetch_error)
    }

    async fn remove(&self, id: AppointmentId) -> Result<(), AppointmentError> {
        let request = Request::new(self.endpoint.item_url(id)).method(Method::Delete);
        send(request, Some(id)).await?;
        Ok(())
    }
}
