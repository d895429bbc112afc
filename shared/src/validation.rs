use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use crate::appointment::{Appointment, NewAppointment};
use crate::dates;

pub const DESCRIPTION_MIN: usize = 3;
pub const DESCRIPTION_MAX: usize = 200;
pub const RESPONSIBLE_MIN: usize = 2;
pub const RESPONSIBLE_MAX: usize = 100;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub description: String,
    pub date: String,
    pub time: String,
    pub responsible: String,
}

impl From<&Appointment> for AppointmentForm {
    fn from(appointment: &Appointment) -> Self {
        AppointmentForm {
            description: appointment.description.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            responsible: appointment.responsible.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Date,
    Time,
    Responsible,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Description => "Description",
            Field::Date => "Date",
            Field::Time => "Time",
            Field::Responsible => "Responsible",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidFormat,
    PastDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub rule: Rule,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.field, self.rule) {
            (field, Rule::Required) => write!(f, "{} is required", field),
            (field, Rule::TooShort { min }) => {
                write!(f, "{} must have at least {} characters", field, min)
            }
            (field, Rule::TooLong { max }) => {
                write!(f, "{} must have at most {} characters", field, max)
            }
            (Field::Date, Rule::InvalidFormat) => write!(f, "Date must be in the format YYYY-MM-DD"),
            (Field::Time, Rule::InvalidFormat) => write!(f, "Time must be in the format HH:MM"),
            (field, Rule::InvalidFormat) => write!(f, "{} has an invalid format", field),
            (_, Rule::PastDate) => write!(f, "Date cannot be in the past"),
        }
    }
}

/// Every rule violation of one form, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    fn check(&mut self, field: Field, result: Result<(), Rule>) {
        if let Err(rule) = result {
            self.errors.push(FieldError { field, rule });
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn check_length(value: &str, min: usize, max: usize) -> Result<(), Rule> {
    let len = value.chars().count();
    if len == 0 {
        Err(Rule::Required)
    } else if len < min {
        Err(Rule::TooShort { min })
    } else if len > max {
        Err(Rule::TooLong { max })
    } else {
        Ok(())
    }
}

fn check_date(value: &str, today: NaiveDate) -> Result<(), Rule> {
    if value.is_empty() {
        return Err(Rule::Required);
    }
    if !DATE_RE.is_match(value) || dates::parse_date(value).is_none() {
        return Err(Rule::InvalidFormat);
    }
    if dates::is_past_date(value, today) {
        return Err(Rule::PastDate);
    }
    Ok(())
}

fn check_time(value: &str) -> Result<(), Rule> {
    if value.is_empty() {
        Err(Rule::Required)
    } else if !TIME_RE.is_match(value) {
        Err(Rule::InvalidFormat)
    } else {
        Ok(())
    }
}

/// Checks the form against the appointment rules. `today` is the caller's
/// local calendar date; a date equal to it is accepted.
pub fn validate(form: &AppointmentForm, today: NaiveDate) -> Result<NewAppointment, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(
        Field::Description,
        check_length(&form.description, DESCRIPTION_MIN, DESCRIPTION_MAX),
    );
    errors.check(Field::Date, check_date(&form.date, today));
    errors.check(Field::Time, check_time(&form.time));
    errors.check(
        Field::Responsible,
        check_length(&form.responsible, RESPONSIBLE_MIN, RESPONSIBLE_MAX),
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewAppointment {
        description: form.description.clone(),
        date: form.date.clone(),
        time: form.time.clone(),
        responsible: form.responsible.clone(),
    })
}
