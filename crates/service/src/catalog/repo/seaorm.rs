use models::errors::ModelError;
use models::service::{self as service_entity, ServiceDraft};
use models::user;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::catalog::domain::{PopulatedService, ProviderSummary, Service};
use crate::catalog::repository::ServiceRepository;
use crate::errors::ServiceError;

pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

fn populate((s, u): (Service, Option<user::Model>)) -> PopulatedService {
    PopulatedService::from_parts(s, u.map(ProviderSummary::from))
}

#[async_trait::async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn insert(&self, draft: ServiceDraft) -> Result<Service, ServiceError> {
        service_entity::create(&self.db, draft).await.map_err(|e| match e {
            ModelError::Db(m) => ServiceError::Db(m),
            other => ServiceError::Model(other),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, ServiceError> {
        service_entity::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn find_by_id_populated(&self, id: Uuid) -> Result<Option<PopulatedService>, ServiceError> {
        let row = service_entity::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(populate))
    }

    async fn list_populated(&self) -> Result<Vec<PopulatedService>, ServiceError> {
        let rows = service_entity::Entity::find()
            .find_also_related(user::Entity)
            .order_by_asc(service_entity::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(populate).collect())
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Service>, ServiceError> {
        service_entity::Entity::find()
            .filter(service_entity::Column::ProviderId.eq(provider_id))
            .order_by_asc(service_entity::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = service_entity::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}
