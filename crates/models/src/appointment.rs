use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const DATE_FORMAT_MESSAGE: &str = "date must be in 'YYYY-MM-DD' format";
pub const TIME_FORMAT_MESSAGE: &str = "time must be in 'HH:MM:SS' format";
pub const STATUS_MESSAGE: &str = "status must be one of: scheduled, cancelled, completed";

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date regex"));
static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("time regex"));

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub patient: String,
    #[sea_orm(column_type = "Text")]
    pub practitioner: String,
    #[sea_orm(column_type = "Text")]
    pub date: String,
    #[sea_orm(column_type = "Text")]
    pub time: String,
    pub status: AppointmentStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Appointment status, stored as lowercase text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] =
        [AppointmentStatus::Scheduled, AppointmentStatus::Cancelled, AppointmentStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ModelError::Validation(STATUS_MESSAGE.into()))
    }
}

/// `YYYY-MM-DD`, and a date that exists on the calendar.
pub fn parse_date(s: &str) -> Result<NaiveDate, ModelError> {
    if !DATE_PATTERN.is_match(s) {
        return Err(ModelError::Validation(DATE_FORMAT_MESSAGE.into()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ModelError::Validation(DATE_FORMAT_MESSAGE.into()))
}

/// `HH:MM:SS` on a 24h clock. Leap seconds are refused.
pub fn parse_time(s: &str) -> Result<NaiveTime, ModelError> {
    if !TIME_PATTERN.is_match(s) {
        return Err(ModelError::Validation(TIME_FORMAT_MESSAGE.into()));
    }
    let t = NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(|_| ModelError::Validation(TIME_FORMAT_MESSAGE.into()))?;
    if t.nanosecond() >= 1_000_000_000 {
        return Err(ModelError::Validation(TIME_FORMAT_MESSAGE.into()));
    }
    Ok(t)
}

pub fn slot_timestamp(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}
