use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Raw record as stored; `provider` serializes as the owner's id.
pub type Service = models::service::Model;

/// Creation fields as received from the client. Any may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewService {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

/// Creation fields after presence and number checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedService {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl NewService {
    pub fn new(name: &str, description: &str, price: &str, category: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            price: Some(price.to_string()),
            category: Some(category.to_string()),
        }
    }

    pub fn validate(&self) -> Result<ValidatedService, ServiceError> {
        let (Some(name), Some(description), Some(price), Some(category)) =
            (present(&self.name), present(&self.description), present(&self.price), present(&self.category))
        else {
            return Err(ServiceError::Validation("All fields are required".into()));
        };
        let price: f64 = price
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| ServiceError::Validation("price must be a number".into()))?;
        Ok(ValidatedService {
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
        })
    }
}

/// The only owner fields exposed on populated reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub name: String,
    pub email: String,
}

impl From<models::user::Model> for ProviderSummary {
    fn from(u: models::user::Model) -> Self {
        Self { name: u.name, email: u.email }
    }
}

/// A record with `provider` resolved; `null` when the owner row is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedService {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub provider: Option<ProviderSummary>,
    pub created_at: DateTime<FixedOffset>,
}

impl PopulatedService {
    pub fn from_parts(s: Service, provider: Option<ProviderSummary>) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            price: s.price,
            category: s.category,
            image: s.image,
            provider,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_required() {
        let full = NewService::new("Haircut", "Basic cut", "20", "Grooming");
        assert!(full.validate().is_ok());

        for blank in 0..4 {
            let mut input = full.clone();
            match blank {
                0 => input.name = None,
                1 => input.description = Some("   ".into()),
                2 => input.price = None,
                _ => input.category = Some(String::new()),
            }
            match input.validate() {
                Err(ServiceError::Validation(m)) => assert_eq!(m, "All fields are required"),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn price_must_parse_as_finite_number() {
        let v = NewService::new("Haircut", "Basic cut", " 19.5 ", "Grooming").validate().unwrap();
        assert_eq!(v.price, 19.5);

        for bad in ["twenty", "NaN", "inf"] {
            let err = NewService::new("Haircut", "Basic cut", bad, "Grooming").validate().unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ref m) if m == "price must be a number"), "{bad}");
        }
    }

    #[test]
    fn populated_provider_exposes_name_and_email_only() {
        let s = Service {
            id: Uuid::new_v4(),
            name: "Haircut".into(),
            description: "Basic cut".into(),
            price: 20.0,
            category: "Grooming".into(),
            image: "https://res.cloudinary.com/demo/a.jpg".into(),
            provider_id: Uuid::new_v4(),
            created_at: chrono::Utc::now().into(),
        };
        let p = PopulatedService::from_parts(s, Some(ProviderSummary { name: "Pat".into(), email: "pat@example.com".into() }));
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["provider"], serde_json::json!({"name": "Pat", "email": "pat@example.com"}));

        let orphan = PopulatedService { provider: None, ..p };
        assert!(serde_json::to_value(&orphan).unwrap()["provider"].is_null());
    }
}
