use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

/// A bookable offering. `provider_id` is written once from the caller identity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    #[serde(rename = "provider")]
    pub provider_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Provider }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(user::Entity)
                .from(Column::ProviderId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fully resolved values for a new row; the image URL comes from the asset store.
#[derive(Clone, Debug)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub provider_id: Uuid,
}

pub fn validate_text(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() {
        return Err(errors::ModelError::Validation("price must be a number".into()));
    }
    Ok(())
}

pub fn validate_image_url(u: &str) -> Result<(), errors::ModelError> {
    if !(u.starts_with("http://") || u.starts_with("https://")) {
        return Err(errors::ModelError::Validation("image must be an http(s) URL".into()));
    }
    Ok(())
}

pub fn validate_draft(d: &ServiceDraft) -> Result<(), errors::ModelError> {
    validate_text("name", &d.name)?;
    validate_text("description", &d.description)?;
    validate_text("category", &d.category)?;
    validate_price(d.price)?;
    validate_image_url(&d.image)
}

pub async fn create(db: &DatabaseConnection, draft: ServiceDraft) -> Result<Model, errors::ModelError> {
    validate_draft(&draft)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(draft.name),
        description: Set(draft.description),
        price: Set(draft.price),
        category: Set(draft.category),
        image: Set(draft.image),
        provider_id: Set(draft.provider_id),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
