//! Appointment module: domain types, validation, repository, service.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;
pub mod validation;

pub use errors::AppointmentError;
pub use service::AppointmentService;
