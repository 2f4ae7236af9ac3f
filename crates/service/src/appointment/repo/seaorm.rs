use chrono::{NaiveDate, NaiveTime};
use models::appointment::{self, Column, Entity};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::appointment::domain::{Appointment, AppointmentPatch, NewAppointment, DATE_FORMAT, TIME_FORMAT};
use crate::appointment::errors::AppointmentError;
use crate::appointment::repository::AppointmentRepository;

pub struct SeaOrmAppointmentRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAppointmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl AppointmentRepository for SeaOrmAppointmentRepository {
    async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(Entity::find().order_by_asc(Column::Id).all(&self.db).await?)
    }

    async fn count_in_slot(&self, date: NaiveDate, time: NaiveTime) -> Result<u64, AppointmentError> {
        let n = Entity::find()
            .filter(Column::Date.eq(date.format(DATE_FORMAT).to_string()))
            .filter(Column::Time.eq(time.format(TIME_FORMAT).to_string()))
            .count(&self.db)
            .await?;
        Ok(n)
    }

    async fn insert(&self, new: &NewAppointment) -> Result<Appointment, AppointmentError> {
        let am = appointment::ActiveModel {
            id: NotSet,
            patient: Set(new.patient.clone()),
            practitioner: Set(new.practitioner.clone()),
            date: Set(new.date_text()),
            time: Set(new.time_text()),
            status: Set(new.status),
        };
        // Unique violations on the slot index surface as SlotTaken via From<DbErr>.
        Ok(am.insert(&self.db).await?)
    }

    async fn find(&self, id: i32) -> Result<Option<Appointment>, AppointmentError> {
        Ok(Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn update(&self, id: i32, patch: &AppointmentPatch) -> Result<u64, AppointmentError> {
        if patch.is_empty() {
            return Ok(0);
        }
        let mut q = Entity::update_many();
        if let Some(p) = &patch.patient {
            q = q.col_expr(Column::Patient, Expr::value(p.clone()));
        }
        if let Some(p) = &patch.practitioner {
            q = q.col_expr(Column::Practitioner, Expr::value(p.clone()));
        }
        if let Some(d) = patch.date {
            q = q.col_expr(Column::Date, Expr::value(d.format(DATE_FORMAT).to_string()));
        }
        if let Some(t) = patch.time {
            q = q.col_expr(Column::Time, Expr::value(t.format(TIME_FORMAT).to_string()));
        }
        if let Some(s) = patch.status {
            q = q.col_expr(Column::Status, Expr::value(s.as_str()));
        }
        let res = q.filter(Column::Id.eq(id)).exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    async fn delete(&self, id: i32) -> Result<u64, AppointmentError> {
        let res = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }
}
