//! Create `service` table.
//!
//! No foreign key to `user`: accounts live in another subsystem, and a
//! listing whose owner disappears resolves its provider to null.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(string_len(Service::Name, 256).not_null())
                    .col(text(Service::Description).not_null())
                    .col(double(Service::Price).not_null())
                    .col(string_len(Service::Category, 128).not_null())
                    .col(string_len(Service::Image, 1024).not_null())
                    .col(uuid(Service::ProviderId).not_null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Id, Name, Description, Price, Category, Image, ProviderId, CreatedAt }
