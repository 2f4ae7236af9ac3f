use chrono::{NaiveDate, NaiveTime};
use models::appointment::AppointmentStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored appointment row as returned to callers.
pub type Appointment = models::appointment::Model;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Validated create input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient: String,
    pub practitioner: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_text(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// Validated partial update. `None` means "leave the column alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub patient: Option<String>,
    pub practitioner: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        self.patient.is_none()
            && self.practitioner.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.status.is_none()
    }
}

/// One failed field check, shaped like the entries of an `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub location: String,
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn body(field: &str, message: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            location: "body".into(),
            field: field.into(),
            message: message.into(),
            value: value.cloned(),
        }
    }
}
