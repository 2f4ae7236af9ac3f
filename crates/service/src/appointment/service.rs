use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use mockable::Clock;
use models::appointment::{parse_date, parse_time, slot_timestamp};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::clock::naive_now;
use super::domain::Appointment;
use super::errors::AppointmentError;
use super::repository::AppointmentRepository;
use super::validation::{row_id, validate_create, validate_patch};

/// Appointment business service independent of web framework
pub struct AppointmentService {
    repo: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl AppointmentService {
    pub fn new(repo: Arc<dyn AppointmentRepository>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { repo, clock }
    }

    /// Every stored appointment.
    pub async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let rows = self.repo.list().await?;
        debug!(count = rows.len(), "appointments_listed");
        Ok(rows)
    }

    /// Book a new appointment from a raw JSON body.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::appointment::{AppointmentService, repository::mock::InMemoryAppointmentRepository};
    /// let svc = AppointmentService::new(Arc::new(InMemoryAppointmentRepository::default()), Arc::new(mockable::DefaultClock));
    /// let body = serde_json::json!({
    ///     "patient": "Ana", "practitioner": "Dr. Lima",
    ///     "date": "2999-01-01", "time": "10:00:00", "status": "scheduled"
    /// });
    /// let created = tokio_test::block_on(svc.create(&body)).unwrap();
    /// assert_eq!(created.id, 1);
    /// ```
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Appointment, AppointmentError> {
        let new = validate_create(body).map_err(AppointmentError::Validation)?;
        self.ensure_not_past(new.date, new.time)?;

        if self.repo.count_in_slot(new.date, new.time).await? > 0 {
            debug!(date = %new.date, time = %new.time, "slot_already_taken");
            return Err(AppointmentError::SlotTaken);
        }

        let saved = self.repo.insert(&new).await?;
        info!(id = saved.id, date = %saved.date, time = %saved.time, status = %saved.status, "appointment_created");
        Ok(saved)
    }

    /// Apply a partial update from a raw JSON body to the row named by the
    /// path segment `id`.
    ///
    /// The body is checked before the row is looked up. Moving an appointment
    /// re-checks the past-booking rule against the resulting slot, filling the
    /// missing half from the stored row.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: &str, body: &Value) -> Result<(), AppointmentError> {
        let patch = validate_patch(body).map_err(AppointmentError::Validation)?;
        let id = row_id(id).ok_or(AppointmentError::NotFound)?;
        let existing = self.repo.find(id).await?.ok_or(AppointmentError::NotFound)?;

        match (patch.date, patch.time) {
            (Some(date), Some(time)) => self.ensure_not_past(date, time)?,
            (Some(date), None) => {
                if let Ok(time) = parse_time(&existing.time) {
                    self.ensure_not_past(date, time)?;
                }
            }
            (None, Some(time)) => {
                if let Ok(date) = parse_date(&existing.date) {
                    self.ensure_not_past(date, time)?;
                }
            }
            (None, None) => {}
        }

        if patch.is_empty() {
            return Err(AppointmentError::NothingToUpdate);
        }

        if self.repo.update(id, &patch).await? == 0 {
            return Err(AppointmentError::NoEffect);
        }
        info!(id, "appointment_updated");
        Ok(())
    }

    /// Hard-delete the appointment named by the path segment `id`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AppointmentError> {
        let id = row_id(id).ok_or(AppointmentError::NotFound)?;
        if self.repo.delete(id).await? == 0 {
            return Err(AppointmentError::NotFound);
        }
        info!(id, "appointment_deleted");
        Ok(())
    }

    fn ensure_not_past(&self, date: NaiveDate, time: NaiveTime) -> Result<(), AppointmentError> {
        let slot = slot_timestamp(date, time);
        let now = naive_now(&*self.clock);
        if slot < now {
            debug!(%slot, %now, "rejected_past_slot");
            return Err(AppointmentError::PastBooking);
        }
        Ok(())
    }
}
