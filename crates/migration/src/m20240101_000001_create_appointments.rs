//! Create `appointments` table.
//! One row per booked slot; (date, time) is unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(pk_auto(Appointments::Id))
                    .col(text(Appointments::Patient))
                    .col(text(Appointments::Practitioner))
                    .col(text(Appointments::Date))
                    .col(text(Appointments::Time))
                    .col(text(Appointments::Status))
                    .to_owned(),
            )
            .await?;

        // A slot holds at most one appointment, whoever wins the insert race.
        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_slot")
                    .table(Appointments::Table)
                    .col(Appointments::Date)
                    .col(Appointments::Time)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_appointments_slot").table(Appointments::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Appointments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    Patient,
    Practitioner,
    Date,
    Time,
    Status,
}
