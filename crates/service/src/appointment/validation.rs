//! Request-shape checks, run before the store is touched.
//!
//! Each field has its own validator returning either a value or a [`FieldError`];
//! [`validate_create`] and [`validate_patch`] run all of them and report every
//! failure at once.

use chrono::{NaiveDate, NaiveTime};
use models::appointment::{self as model, AppointmentStatus};
use serde_json::{Map, Value};

use super::domain::{AppointmentPatch, FieldError, NewAppointment};

const BODY_MESSAGE: &str = "request body must be a JSON object";

fn text_message(field: &str) -> String {
    format!("{field} must be a string")
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    body.as_object().ok_or_else(|| vec![FieldError::body("body", BODY_MESSAGE, Some(body))])
}

/// JSON `null` is treated the same as a missing key.
fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn text(field: &str, raw: Option<&Value>) -> Result<String, FieldError> {
    match raw {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(FieldError::body(field, text_message(field), other)),
    }
}

fn date(raw: Option<&Value>) -> Result<NaiveDate, FieldError> {
    match raw {
        Some(Value::String(s)) => model::parse_date(s).map_err(|e| FieldError::body("date", e.message(), raw)),
        other => Err(FieldError::body("date", model::DATE_FORMAT_MESSAGE, other)),
    }
}

fn time(raw: Option<&Value>) -> Result<NaiveTime, FieldError> {
    match raw {
        Some(Value::String(s)) => model::parse_time(s).map_err(|e| FieldError::body("time", e.message(), raw)),
        other => Err(FieldError::body("time", model::TIME_FORMAT_MESSAGE, other)),
    }
}

fn status(raw: Option<&Value>) -> Result<AppointmentStatus, FieldError> {
    match raw {
        Some(Value::String(s)) => s.parse().map_err(|e: models::errors::ModelError| FieldError::body("status", e.message(), raw)),
        other => Err(FieldError::body("status", model::STATUS_MESSAGE, other)),
    }
}

/// Collects field outcomes so every failure is reported, not only the first.
#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn take<T>(&mut self, r: Result<T, FieldError>) -> Option<T> {
        match r {
            Ok(v) => Some(v),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    /// Present-only variant used by partial updates.
    fn take_opt<T>(&mut self, raw: Option<&Value>, f: impl FnOnce(Option<&Value>) -> Result<T, FieldError>) -> Option<T> {
        raw.and_then(|v| self.take(f(Some(v))))
    }
}

/// Validate a create body; all five fields are required.
pub fn validate_create(body: &Value) -> Result<NewAppointment, Vec<FieldError>> {
    let obj = as_object(body)?;
    let mut c = Collector::default();

    let patient = c.take(text("patient", present(obj, "patient")));
    let practitioner = c.take(text("practitioner", present(obj, "practitioner")));
    let date = c.take(date(present(obj, "date")));
    let time = c.take(time(present(obj, "time")));
    let status = c.take(status(present(obj, "status")));

    match (patient, practitioner, date, time, status) {
        (Some(patient), Some(practitioner), Some(date), Some(time), Some(status)) if c.errors.is_empty() => {
            Ok(NewAppointment { patient, practitioner, date, time, status })
        }
        _ => Err(c.errors),
    }
}

/// Empty strings on the text and date/time fields mean "not supplied" for updates.
fn non_blank<'a>(raw: Option<&'a Value>) -> Option<&'a Value> {
    raw.filter(|v| v.as_str().map_or(true, |s| !s.is_empty()))
}

/// Validate a partial update body; only supplied fields are checked.
pub fn validate_patch(body: &Value) -> Result<AppointmentPatch, Vec<FieldError>> {
    let obj = as_object(body)?;
    let mut c = Collector::default();

    let patch = AppointmentPatch {
        patient: c.take_opt(non_blank(present(obj, "patient")), |v| text("patient", v)),
        practitioner: c.take_opt(non_blank(present(obj, "practitioner")), |v| text("practitioner", v)),
        date: c.take_opt(non_blank(present(obj, "date")), date),
        time: c.take_opt(non_blank(present(obj, "time")), time),
        status: c.take_opt(present(obj, "status"), status),
    };

    if c.errors.is_empty() {
        Ok(patch)
    } else {
        Err(c.errors)
    }
}

/// Map a path segment to a row id. Segments no stored row can carry
/// (non-numeric, zero, negative, beyond `i32`) yield `None`.
pub fn row_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}
