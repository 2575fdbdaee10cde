use std::sync::Arc;

use common::types::MessageBody;
use models::service::ServiceDraft;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{NewService, PopulatedService, Service};
use super::repository::ServiceRepository;
use crate::assets::{AssetStore, ImageUpload};
use crate::errors::ServiceError;
use crate::identity::CallerIdentity;

pub const DEFAULT_NAMESPACE: &str = "services";

/// Owns the service resource lifecycle: who may create, list, read and delete.
///
/// Stateless between calls; every operation re-reads the repository.
pub struct ServiceManager {
    repo: Arc<dyn ServiceRepository>,
    assets: Arc<dyn AssetStore>,
    namespace: String,
}

impl ServiceManager {
    pub fn new(repo: Arc<dyn ServiceRepository>, assets: Arc<dyn AssetStore>) -> Self {
        Self { repo, assets, namespace: DEFAULT_NAMESPACE.to_string() }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn namespace(&self) -> &str { &self.namespace }

    /// Create a service owned by the calling provider.
    ///
    /// Fields, role and image are checked before anything is uploaded. The image is
    /// uploaded first and the record persisted second; a failed persist leaves the
    /// uploaded asset in place.
    ///
    /// # Examples
    /// ```
    /// use service::assets::{mock::MockAssetStore, ImageUpload};
    /// use service::catalog::{domain::NewService, repository::mock::MockServiceRepository, ServiceManager};
    /// use service::identity::{CallerIdentity, Role};
    /// use std::sync::Arc;
    /// let mgr = ServiceManager::new(Arc::new(MockServiceRepository::default()), Arc::new(MockAssetStore::default()));
    /// let p1 = CallerIdentity::new(uuid::Uuid::new_v4(), Role::Provider, "p1@example.com", "P1");
    /// let input = NewService::new("Haircut", "Basic cut", "20", "Grooming");
    /// let img = ImageUpload::new(Some("cut.jpg".into()), Some("image/jpeg".into()), vec![0xff, 0xd8]);
    /// let created = tokio_test::block_on(mgr.create(Some(&p1), input, Some(img))).unwrap();
    /// assert_eq!(created.provider_id, p1.id);
    /// ```
    #[instrument(skip(self, caller, input, image), fields(caller = ?caller.map(|c| c.id)))]
    pub async fn create(
        &self,
        caller: Option<&CallerIdentity>,
        input: NewService,
        image: Option<ImageUpload>,
    ) -> Result<Service, ServiceError> {
        let fields = input.validate()?;
        let caller = match caller {
            Some(c) if c.is_provider() => c,
            _ => return Err(ServiceError::Forbidden("Access denied".into())),
        };
        let image = match image {
            Some(img) if !img.is_empty() => img,
            _ => return Err(ServiceError::Validation("Image is required".into())),
        };

        let asset = self
            .assets
            .upload(&image, &self.namespace)
            .await
            .map_err(|e| ServiceError::Upload(e.to_string()))?;

        let draft = ServiceDraft {
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            image: asset.secure_url.clone(),
            provider_id: caller.id,
        };
        match self.repo.insert(draft).await {
            Ok(created) => {
                info!(service_id = %created.id, provider_id = %caller.id, "service_created");
                Ok(created)
            }
            Err(e) => {
                warn!(orphaned_asset = %asset.secure_url, error = %e, "persist failed after upload");
                Err(e)
            }
        }
    }

    /// Every service with its provider resolved. Public.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<PopulatedService>, ServiceError> {
        let rows = self.repo.list_populated().await?;
        info!(count = rows.len(), "services_listed");
        Ok(rows)
    }

    /// The calling provider's own services, unpopulated.
    #[instrument(skip(self, caller), fields(caller = ?caller.map(|c| c.id)))]
    pub async fn list_by_provider(&self, caller: Option<&CallerIdentity>) -> Result<Vec<Service>, ServiceError> {
        let caller = match caller {
            Some(c) if c.is_provider() => c,
            _ => return Err(ServiceError::Forbidden("Access denied".into())),
        };
        let rows = self.repo.list_by_provider(caller.id).await?;
        info!(count = rows.len(), provider_id = %caller.id, "provider_services_listed");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<PopulatedService, ServiceError> {
        self.repo
            .find_by_id_populated(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Service"))
    }

    /// Delete a service. Allowed for its owner and for any provider.
    #[instrument(skip(self, caller), fields(caller = ?caller.map(|c| c.id)))]
    pub async fn delete_by_id(&self, caller: Option<&CallerIdentity>, id: Uuid) -> Result<MessageBody, ServiceError> {
        let existing = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Service"))?;
        let permitted = caller.is_some_and(|c| c.owns(existing.provider_id) || c.is_provider());
        if !permitted {
            return Err(ServiceError::Forbidden("Unauthorized".into()));
        }
        if !self.repo.delete_by_id(id).await? {
            return Err(ServiceError::not_found("Service"));
        }
        info!(service_id = %id, provider_id = %existing.provider_id, "service_deleted");
        Ok(MessageBody::new("Service deleted"))
    }
}
