use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use shared::{AppointmentId, AppointmentPatch, ListParams, NewAppointment};
use tracing::info;

use crate::store::{AppointmentStore, StoreError};

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// json-server style list parameters.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    q: Option<String>,
    #[serde(rename = "_page")]
    page: Option<u32>,
    #[serde(rename = "_limit")]
    limit: Option<u32>,
}

impl From<ListQuery> for ListParams {
    fn from(query: ListQuery) -> Self {
        ListParams {
            query: query.q,
            page: query.page,
            limit: query.limit,
        }
    }
}

// ---- Apis ("/appointments*") ----

#[get("/appointments")]
async fn list_appointments(
    store: web::Data<AppointmentStore>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, StoreError> {
    let params = ListParams::from(query.into_inner());
    let paginated = params.page.is_some() || params.limit.is_some();
    let listing = store.list(&params)?;

    let mut response = HttpResponse::Ok();
    if paginated {
        response.insert_header((TOTAL_COUNT_HEADER, listing.total.to_string()));
    }
    Ok(response.json(listing.appointments))
}

#[get("/appointments/{id}")]
async fn get_appointment(
    store: web::Data<AppointmentStore>,
    id: web::Path<AppointmentId>,
) -> Result<HttpResponse, StoreError> {
    let appointment = store.get(id.into_inner())?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[post("/appointments")]
async fn create_appointment(
    store: web::Data<AppointmentStore>,
    new: web::Json<NewAppointment>,
) -> Result<HttpResponse, StoreError> {
    let appointment = store.create(new.into_inner())?;
    info!(id = appointment.id, "appointment created");
    Ok(HttpResponse::Created().json(appointment))
}

#[put("/appointments/{id}")]
async fn update_appointment(
    store: web::Data<AppointmentStore>,
    id: web::Path<AppointmentId>,
    patch: web::Json<AppointmentPatch>,
) -> Result<HttpResponse, StoreError> {
    // the path decides which record changes
    let mut patch = patch.into_inner();
    patch.id = id.into_inner();
    let appointment = store.update(&patch)?;
    info!(id = appointment.id, "appointment updated");
    Ok(HttpResponse::Ok().json(appointment))
}

#[delete("/appointments/{id}")]
async fn delete_appointment(
    store: web::Data<AppointmentStore>,
    id: web::Path<AppointmentId>,
) -> Result<HttpResponse, StoreError> {
    let id = id.into_inner();
    store.remove(id)?;
    info!(id, "appointment removed");
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_appointments)
        .service(get_appointment)
        .service(create_appointment)
        .service(update_appointment)
        .service(delete_appointment);
}
