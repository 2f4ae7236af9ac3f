//! Service layer for the appointment agenda.
//! - Validates raw request payloads before any store access.
//! - Applies the booking rules (no past slots, one appointment per slot).
//! - Talks to storage only through `AppointmentRepository`.

pub mod appointment;
#[cfg(test)]
pub mod test_support;
