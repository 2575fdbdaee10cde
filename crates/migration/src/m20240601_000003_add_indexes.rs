use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: provider scoped listing
        manager
            .create_index(
                Index::create()
                    .name("idx_service_provider")
                    .table(Service::Table)
                    .col(Service::ProviderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Service: insertion-ordered listing
        manager
            .create_index(
                Index::create()
                    .name("idx_service_created_at")
                    .table(Service::Table)
                    .col(Service::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_created_at").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_provider").table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, ProviderId, CreatedAt }
