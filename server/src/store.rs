use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use shared::{Appointment, AppointmentId, AppointmentPatch, ListParams, NewAppointment};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Appointment {0} not found")]
    NotFound(AppointmentId),
    #[error("Storage error: {0}")]
    Io(#[from] io::Error),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// One page of a listing plus the number of matches before paging.
#[derive(Debug)]
pub struct Listing {
    pub appointments: Vec<Appointment>,
    pub total: usize,
}

/// Appointments kept in a single json file. Every access goes through the
/// mutex, so id assignment never hands out the same id twice.
pub struct AppointmentStore {
    db: Mutex<jfs::Store>,
}

fn load_all(db: &jfs::Store) -> Result<Vec<Appointment>, StoreError> {
    let mut appointments = db.all::<Appointment>()?.into_values().collect::<Vec<_>>();
    appointments.sort_by_key(|appointment| appointment.id);
    Ok(appointments)
}

fn load(db: &jfs::Store, id: AppointmentId) -> Result<Appointment, StoreError> {
    db.all::<Appointment>()?
        .remove(&id.to_string())
        .ok_or(StoreError::NotFound(id))
}

impl AppointmentStore {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut cfg = jfs::Config::default();
        cfg.single = true;
        cfg.pretty = true;
        let db = jfs::Store::new_with_cfg(path, cfg)?;
        info!(path = %path.display(), "opened appointment store");

        Ok(AppointmentStore { db: Mutex::new(db) })
    }

    fn db(&self) -> MutexGuard<'_, jfs::Store> {
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `q` matches any text field case-insensitively. A page without a limit
    /// uses [`DEFAULT_PAGE_LIMIT`]; a limit without a page takes the first
    /// `limit` matches.
    pub fn list(&self, params: &ListParams) -> Result<Listing, StoreError> {
        let mut appointments = load_all(&self.db())?;

        if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            appointments.retain(|appointment| {
                [
                    &appointment.description,
                    &appointment.date,
                    &appointment.time,
                    &appointment.responsible,
                ]
                .iter()
                .any(|value| value.to_lowercase().contains(&needle))
            });
        }

        let total = appointments.len();
        let limit = match (params.page, params.limit) {
            (_, Some(limit)) => Some(limit as usize),
            (Some(_), None) => Some(DEFAULT_PAGE_LIMIT as usize),
            (None, None) => None,
        };

        if let Some(limit) = limit {
            let page = params.page.unwrap_or(1).max(1) as usize;
            appointments = appointments
                .into_iter()
                .skip((page - 1) * limit)
                .take(limit)
                .collect();
        }

        Ok(Listing {
            appointments,
            total,
        })
    }

    pub fn get(&self, id: AppointmentId) -> Result<Appointment, StoreError> {
        load(&self.db(), id)
    }

    pub fn create(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let db = self.db();
        let id = load_all(&db)?.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let appointment = new.with_id(id);
        db.save_with_id(&appointment, &id.to_string())?;
        debug!(id, "appointment created");
        Ok(appointment)
    }

    pub fn update(&self, patch: &AppointmentPatch) -> Result<Appointment, StoreError> {
        let db = self.db();
        let mut appointment = load(&db, patch.id)?;
        patch.apply_to(&mut appointment);
        db.save_with_id(&appointment, &appointment.id.to_string())?;
        debug!(id = appointment.id, "appointment updated");
        Ok(appointment)
    }

    pub fn remove(&self, id: AppointmentId) -> Result<(), StoreError> {
        let db = self.db();
        load(&db, id)?;
        db.delete(&id.to_string())?;
        debug!(id, "appointment removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(description: &str, responsible: &str) -> NewAppointment {
        NewAppointment {
            description: description.to_string(),
            date: "2030-06-01".to_string(),
            time: "08:30".to_string(),
            responsible: responsible.to_string(),
        }
    }

    fn open() -> (tempfile::TempDir, AppointmentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AppointmentStore::open(dir.path().join("data").join("appointments")).unwrap();
        (dir, store)
    }

    #[test]
    fn assigns_increasing_ids() {
        let (_dir, store) = open();
        let first = store.create(new("Standup", "Alex")).unwrap();
        let second = store.create(new("Retro", "Sam")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        store.remove(2).unwrap();
        assert_eq!(store.create(new("Planning", "Kim")).unwrap().id, 2);
    }

    #[test]
    fn lists_in_id_order_across_ten() {
        let (_dir, store) = open();
        for i in 0..12 {
            store.create(new(&format!("Item {}", i), "Alex")).unwrap();
        }
        let ids: Vec<_> = store
            .list(&ListParams::default())
            .unwrap()
            .appointments
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn searches_every_text_field() {
        let (_dir, store) = open();
        store.create(new("Standup", "Alex")).unwrap();
        store.create(new("Dentist", "Sam")).unwrap();

        let by_description = store.list(&ListParams::default().query("STAND")).unwrap();
        assert_eq!(by_description.total, 1);
        let by_responsible = store.list(&ListParams::default().query("sam")).unwrap();
        assert_eq!(by_responsible.appointments[0].description, "Dentist");
    }

    #[test]
    fn pages_with_default_limit() {
        let (_dir, store) = open();
        for i in 0..15 {
            store.create(new(&format!("Item {}", i), "Alex")).unwrap();
        }

        let second = store.list(&ListParams::default().page(2)).unwrap();
        assert_eq!(second.total, 15);
        assert_eq!(second.appointments.len(), 5);
        assert_eq!(second.appointments[0].id, 11);

        let limited = store.list(&ListParams::default().limit(3)).unwrap();
        assert_eq!(limited.appointments.len(), 3);
    }

    #[test]
    fn update_merges_and_missing_ids_fail() {
        let (_dir, store) = open();
        store.create(new("Standup", "Alex")).unwrap();

        let updated = store
            .update(&AppointmentPatch::new(1).description("Renamed"))
            .unwrap();
        assert_eq!(updated.description, "Renamed");
        assert_eq!(updated.responsible, "Alex");
        assert_eq!(store.get(1).unwrap(), updated);

        assert!(matches!(
            store.update(&AppointmentPatch::new(5).time("10:00")),
            Err(StoreError::NotFound(5))
        ));
        assert!(matches!(store.remove(5), Err(StoreError::NotFound(5))));
        assert!(matches!(store.get(5), Err(StoreError::NotFound(5))));
    }
}
