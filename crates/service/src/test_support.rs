#![cfg(test)]
use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::appointment::clock::FixedClock;

/// Fresh in-memory SQLite database with the schema applied.
pub async fn memory_db() -> Result<DatabaseConnection, Box<dyn std::error::Error>> {
    let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// 2026-10-15 09:00:00 local time.
pub fn clock() -> FixedClock {
    let now = NaiveDate::from_ymd_opt(2026, 10, 15)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid fixed instant");
    FixedClock::at(now)
}
