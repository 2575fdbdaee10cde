//! Service catalog: three-layer architecture (domain, repository, service).
//!
//! Identity is always an explicit argument; this module never reads request state.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::ServiceManager;
