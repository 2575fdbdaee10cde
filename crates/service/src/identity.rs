use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role as carried in the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Provider,
    Customer,
    Admin,
    #[serde(other)]
    Unknown,
}

/// Authenticated caller, injected by the upstream auth layer and trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub name: String,
}

impl CallerIdentity {
    pub fn new(id: Uuid, role: Role, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id, role, email: email.into(), name: name.into() }
    }

    pub fn is_provider(&self) -> bool { self.role == Role::Provider }

    pub fn owns(&self, provider_id: Uuid) -> bool { self.id == provider_id }
}
