use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use super::domain::{Appointment, AppointmentPatch, NewAppointment};
use super::errors::AppointmentError;

/// Persistence seam for appointments.
///
/// Implementations must reject a second row in an occupied (date, time) slot
/// with [`AppointmentError::SlotTaken`], both on insert and on update.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Appointment>, AppointmentError>;
    async fn count_in_slot(&self, date: NaiveDate, time: NaiveTime) -> Result<u64, AppointmentError>;
    async fn insert(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError>;
    async fn find(&self, id: i32) -> Result<Option<Appointment>, AppointmentError>;
    /// Returns the number of rows the store reports as changed.
    async fn update(&self, id: i32, patch: &AppointmentPatch) -> Result<u64, AppointmentError>;
    /// Returns the number of rows removed.
    async fn delete(&self, id: i32) -> Result<u64, AppointmentError>;
}

/// Simple in-memory repositories for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use crate::appointment::domain::{DATE_FORMAT, TIME_FORMAT};

    #[derive(Default)]
    struct Table {
        rows: BTreeMap<i32, Appointment>,
        last_id: i32,
    }

    impl Table {
        fn slot_owner(&self, date: &str, time: &str) -> Option<i32> {
            self.rows.values().find(|r| r.date == date && r.time == time).map(|r| r.id)
        }
    }

    #[derive(Default)]
    pub struct InMemoryAppointmentRepository {
        table: Mutex<Table>,
    }

    impl InMemoryAppointmentRepository {
        fn lock(&self) -> Result<MutexGuard<'_, Table>, AppointmentError> {
            self.table
                .lock()
                .map_err(|_| AppointmentError::Repository("in-memory table lock poisoned".into()))
        }
    }

    #[async_trait]
    impl AppointmentRepository for InMemoryAppointmentRepository {
        async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
            Ok(self.lock()?.rows.values().cloned().collect())
        }

        async fn count_in_slot(&self, date: NaiveDate, time: NaiveTime) -> Result<u64, AppointmentError> {
            let (date, time) = (date.format(DATE_FORMAT).to_string(), time.format(TIME_FORMAT).to_string());
            let table = self.lock()?;
            Ok(table.rows.values().filter(|r| r.date == date && r.time == time).count() as u64)
        }

        async fn insert(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError> {
            let mut table = self.lock()?;
            let (date, time) = (new.date_text(), new.time_text());
            if table.slot_owner(&date, &time).is_some() {
                return Err(AppointmentError::SlotTaken);
            }
            table.last_id += 1;
            let row = Appointment {
                id: table.last_id,
                patient: new.patient.clone(),
                practitioner: new.practitioner.clone(),
                date,
                time,
                status: new.status,
            };
            table.rows.insert(row.id, row.clone());
            Ok(row)
        }

        async fn find(&self, id: i32) -> Result<Option<Appointment>, AppointmentError> {
            Ok(self.lock()?.rows.get(&id).cloned())
        }

        async fn update(&self, id: i32, patch: &AppointmentPatch) -> Result<u64, AppointmentError> {
            let mut table = self.lock()?;
            let Some(current) = table.rows.get(&id).cloned() else {
                return Ok(0);
            };
            let date = patch.date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or(current.date);
            let time = patch.time.map(|t| t.format(TIME_FORMAT).to_string()).unwrap_or(current.time);
            if matches!(table.slot_owner(&date, &time), Some(owner) if owner != id) {
                return Err(AppointmentError::SlotTaken);
            }
            let row = Appointment {
                id,
                patient: patch.patient.clone().unwrap_or(current.patient),
                practitioner: patch.practitioner.clone().unwrap_or(current.practitioner),
                date,
                time,
                status: patch.status.unwrap_or(current.status),
            };
            table.rows.insert(id, row);
            Ok(1)
        }

        async fn delete(&self, id: i32) -> Result<u64, AppointmentError> {
            Ok(self.lock()?.rows.remove(&id).map_or(0, |_| 1))
        }
    }

    /// Rows are found but every write matches nothing, as when a row is removed
    /// between the lookup and the update.
    #[derive(Default)]
    pub struct VanishingAppointmentRepository {
        pub inner: InMemoryAppointmentRepository,
    }

    #[async_trait]
    impl AppointmentRepository for VanishingAppointmentRepository {
        async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
            self.inner.list().await
        }

        async fn count_in_slot(&self, date: NaiveDate, time: NaiveTime) -> Result<u64, AppointmentError> {
            self.inner.count_in_slot(date, time).await
        }

        async fn insert(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError> {
            self.inner.insert(new).await
        }

        async fn find(&self, id: i32) -> Result<Option<Appointment>, AppointmentError> {
            self.inner.find(id).await
        }

        async fn update(&self, _id: i32, _patch: &AppointmentPatch) -> Result<u64, AppointmentError> {
            Ok(0)
        }

        async fn delete(&self, id: i32) -> Result<u64, AppointmentError> {
            self.inner.delete(id).await
        }
    }

    /// Repository whose every call fails, standing in for an unreachable store.
    pub struct UnavailableAppointmentRepository {
        pub message: String,
    }

    impl UnavailableAppointmentRepository {
        fn fail<T>(&self) -> Result<T, AppointmentError> {
            Err(AppointmentError::Repository(self.message.clone()))
        }
    }

    #[async_trait]
    impl AppointmentRepository for UnavailableAppointmentRepository {
        async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
            self.fail()
        }

        async fn count_in_slot(&self, _date: NaiveDate, _time: NaiveTime) -> Result<u64, AppointmentError> {
            self.fail()
        }

        async fn insert(&self, _new: &NewAppointment) -> Result<Appointment, AppointmentError> {
            self.fail()
        }

        async fn find(&self, _id: i32) -> Result<Option<Appointment>, AppointmentError> {
            self.fail()
        }

        async fn update(&self, _id: i32, _patch: &AppointmentPatch) -> Result<u64, AppointmentError> {
            self.fail()
        }

        async fn delete(&self, _id: i32) -> Result<u64, AppointmentError> {
            self.fail()
        }
    }
}
