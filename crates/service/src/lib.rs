//! Service layer for the booking marketplace catalog.
//! - `catalog` owns the Service resource lifecycle and its authorization rules.
//! - `assets` uploads images to an external store before records are persisted.
//! - Caller identity is passed explicitly into every guarded operation.

pub mod errors;
pub mod identity;
pub mod assets;
pub mod catalog;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
