use thiserror::Error;

use super::domain::FieldError;

/// Failures of the appointment workflows, from input checks down to storage.
#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("validation failed: {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("cannot schedule in the past")]
    PastBooking,
    #[error("an appointment already exists for that date and time")]
    SlotTaken,
    #[error("no fields to update were provided")]
    NothingToUpdate,
    #[error("the update had no effect")]
    NoEffect,
    #[error("appointment not found")]
    NotFound,
    #[error("repository error: {0}")]
    Repository(String),
}

impl AppointmentError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AppointmentError::Validation(_) => 2001,
            AppointmentError::PastBooking => 2002,
            AppointmentError::SlotTaken => 2003,
            AppointmentError::NothingToUpdate => 2004,
            AppointmentError::NoEffect => 2005,
            AppointmentError::NotFound => 2006,
            AppointmentError::Repository(_) => 2200,
        }
    }
}

impl From<sea_orm::DbErr> for AppointmentError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppointmentError::SlotTaken,
            _ => AppointmentError::Repository(e.to_string()),
        }
    }
}
