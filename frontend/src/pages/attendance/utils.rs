use chrono::NaiveDate;

use crate::{
    api::{AttendanceFilter, AttendanceStatus, FieldErrors, MarkAttendance, RecordId, NON_FIELD_ERRORS},
    utils::time::parse_date_input,
};

const REQUIRED: &str = "This field is required.";
const DATE_FORMAT: &str = "Enter a valid date in YYYY-MM-DD format.";

/// Raw input of the "mark attendance" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceForm {
    pub employee: Option<RecordId>,
    pub date: String,
    pub status: AttendanceStatus,
}

impl AttendanceForm {
    /// Empty employee, `today`, Present.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            employee: None,
            date: today.format("%Y-%m-%d").to_string(),
            status: AttendanceStatus::Present,
        }
    }

    pub fn to_payload(&self) -> Result<MarkAttendance, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.employee.is_none() {
            errors.push("employee", REQUIRED);
        }
        let date = match parse_date_input(&self.date) {
            Ok(Some(date)) => Some(date),
            Ok(None) => {
                errors.push("date", REQUIRED);
                None
            }
            Err(_) => {
                errors.push("date", DATE_FORMAT);
                None
            }
        };
        match (self.employee.clone(), date) {
            (Some(employee), Some(date)) if errors.is_empty() => Ok(MarkAttendance {
                employee,
                date,
                status: self.status,
            }),
            _ => Err(errors),
        }
    }
}

/// Date filter inputs; blank fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub date: String,
    pub from: String,
    pub to: String,
}

impl FilterForm {
    pub fn to_filter(&self) -> Result<AttendanceFilter, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut parse = |field: &str, raw: &str| match parse_date_input(raw) {
            Ok(value) => value,
            Err(_) => {
                errors.push(field, DATE_FORMAT);
                None
            }
        };
        let date = parse("date", &self.date);
        let from = parse("from", &self.from);
        let to = parse("to", &self.to);
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                errors.push(NON_FIELD_ERRORS, "The start date must not be after the end date.");
            }
        }
        if errors.is_empty() {
            Ok(AttendanceFilter { date, from, to })
        } else {
            Err(errors)
        }
    }
}
