//! SeaORM entities for the service catalog plus connection helpers.

pub mod errors;
pub mod db;
pub mod user;
pub mod service;

#[cfg(test)]
mod tests;
