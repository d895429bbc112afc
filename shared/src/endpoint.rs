//! URLs and status handling of the `/appointments` REST collection.

use crate::appointment::{AppointmentId, ListParams};
use crate::error::AppointmentError;

pub const COLLECTION_PATH: &str = "/appointments";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Endpoint { base }
    }

    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base, COLLECTION_PATH)
    }

    pub fn item_url(&self, id: AppointmentId) -> String {
        format!("{}{}/{}", self.base, COLLECTION_PATH, id)
    }

    /// Collection URL with the search parameters that are set. Empty queries
    /// and zero page/limit values are treated as unset.
    pub fn list_url(&self, params: &ListParams) -> String {
        let mut pairs = vec![];
        if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(format!("q={}", urlencoding::encode(query)));
        }
        if let Some(page) = params.page.filter(|p| *p > 0) {
            pairs.push(format!("_page={}", page));
        }
        if let Some(limit) = params.limit.filter(|l| *l > 0) {
            pairs.push(format!("_limit={}", limit));
        }

        if pairs.is_empty() {
            self.collection_url()
        } else {
            format!("{}?{}", self.collection_url(), pairs.join("&"))
        }
    }
}

/// Maps a response status onto the error taxonomy. `target` is the id the
/// request addressed, if any; a 404 for it means the appointment is gone.
pub fn check_status(status: u16, target: Option<AppointmentId>) -> Result<(), AppointmentError> {
    match (status, target) {
        (200..=299, _) => Ok(()),
        (404, Some(id)) => Err(AppointmentError::NotFound { id }),
        (status, _) => Err(AppointmentError::RequestFailed { status }),
    }
}
