use serde::{Deserialize, Serialize};

/// Identifier assigned by the appointment store.
pub type AppointmentId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// 24 hour clock, `HH:MM`.
    pub time: String,
    pub responsible: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub description: String,
    pub date: String,
    pub time: String,
    pub responsible: String,
}

impl NewAppointment {
    pub fn with_id(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            description: self.description,
            date: self.date,
            time: self.time,
            responsible: self.responsible,
        }
    }
}

/// Partial update. Fields left as `None` are not serialized, so the store
/// keeps their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default)]
    pub id: AppointmentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
}

impl AppointmentPatch {
    pub fn new(id: AppointmentId) -> Self {
        AppointmentPatch {
            id,
            ..Default::default()
        }
    }

    /// A patch that overwrites every field, as sent by the edit form.
    pub fn replace(id: AppointmentId, fields: NewAppointment) -> Self {
        AppointmentPatch {
            id,
            description: Some(fields.description),
            date: Some(fields.date),
            time: Some(fields.time),
            responsible: Some(fields.responsible),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = Some(responsible.into());
        self
    }

    /// Merges the set fields into `target`. The id is never touched.
    pub fn apply_to(&self, target: &mut Appointment) {
        if let Some(description) = &self.description {
            target.description = description.clone();
        }
        if let Some(date) = &self.date {
            target.date = date.clone();
        }
        if let Some(time) = &self.time {
            target.time = time.clone();
        }
        if let Some(responsible) = &self.responsible {
            target.responsible = responsible.clone();
        }
    }
}

/// Optional search and paging parameters of the list call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListParams {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standup() -> Appointment {
        Appointment {
            id: 1,
            description: "Standup".to_string(),
            date: "2030-01-02".to_string(),
            time: "09:00".to_string(),
            responsible: "Alex".to_string(),
        }
    }

    #[test]
    fn patch_only_serializes_set_fields() {
        let patch = AppointmentPatch::new(1).description("Renamed");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "description": "Renamed"}));
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let mut appointment = standup();
        AppointmentPatch::new(1)
            .description("Renamed")
            .apply_to(&mut appointment);

        assert_eq!(appointment.description, "Renamed");
        assert_eq!(appointment.date, "2030-01-02");
        assert_eq!(appointment.time, "09:00");
        assert_eq!(appointment.responsible, "Alex");
    }

    #[test]
    fn patch_never_changes_the_id() {
        let mut appointment = standup();
        AppointmentPatch::new(99).time("10:30").apply_to(&mut appointment);
        assert_eq!(appointment.id, 1);
        assert_eq!(appointment.time, "10:30");
    }

    #[test]
    fn appointment_reads_store_json() {
        let appointment: Appointment = serde_json::from_str(
            r#"{"id":7,"description":"Review","date":"2030-05-01","time":"14:30","responsible":"Sam"}"#,
        )
        .unwrap();
        assert_eq!(appointment.id, 7);
        assert_eq!(appointment.responsible, "Sam");
    }
}
