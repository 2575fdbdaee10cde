use async_trait::async_trait;
use models::service::ServiceDraft;
use uuid::Uuid;

use super::domain::{PopulatedService, Service};
use crate::errors::ServiceError;

/// Persistence boundary for service records. Reads are ordered by creation time.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn insert(&self, draft: ServiceDraft) -> Result<Service, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, ServiceError>;
    async fn find_by_id_populated(&self, id: Uuid) -> Result<Option<PopulatedService>, ServiceError>;
    async fn list_populated(&self) -> Result<Vec<PopulatedService>, ServiceError>;
    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Service>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::catalog::domain::ProviderSummary;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockServiceRepository {
        rows: Mutex<Vec<Service>>,                        // insertion order
        users: Mutex<HashMap<Uuid, ProviderSummary>>,     // key: user id
        fail_inserts: AtomicBool,
    }

    fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    impl MockServiceRepository {
        /// Register a user row so populated reads can resolve it.
        pub fn add_user(&self, id: Uuid, name: &str, email: &str) {
            guard(&self.users).insert(id, ProviderSummary { name: name.into(), email: email.into() });
        }

        pub fn set_fail_inserts(&self, fail: bool) { self.fail_inserts.store(fail, Ordering::SeqCst); }

        pub fn len(&self) -> usize { guard(&self.rows).len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn populate(&self, s: Service) -> PopulatedService {
            let provider = guard(&self.users).get(&s.provider_id).cloned();
            PopulatedService::from_parts(s, provider)
        }
    }

    #[async_trait]
    impl ServiceRepository for MockServiceRepository {
        async fn insert(&self, draft: ServiceDraft) -> Result<Service, ServiceError> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            models::service::validate_draft(&draft)?;
            let row = Service {
                id: Uuid::new_v4(),
                name: draft.name,
                description: draft.description,
                price: draft.price,
                category: draft.category,
                image: draft.image,
                provider_id: draft.provider_id,
                created_at: chrono::Utc::now().into(),
            };
            guard(&self.rows).push(row.clone());
            Ok(row)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, ServiceError> {
            Ok(guard(&self.rows).iter().find(|s| s.id == id).cloned())
        }

        async fn find_by_id_populated(&self, id: Uuid) -> Result<Option<PopulatedService>, ServiceError> {
            let row = guard(&self.rows).iter().find(|s| s.id == id).cloned();
            Ok(row.map(|s| self.populate(s)))
        }

        async fn list_populated(&self) -> Result<Vec<PopulatedService>, ServiceError> {
            let rows = guard(&self.rows).clone();
            Ok(rows.into_iter().map(|s| self.populate(s)).collect())
        }

        async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<Service>, ServiceError> {
            Ok(guard(&self.rows).iter().filter(|s| s.provider_id == provider_id).cloned().collect())
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut rows = guard(&self.rows);
            let before = rows.len();
            rows.retain(|s| s.id != id);
            Ok(rows.len() != before)
        }
    }
}
