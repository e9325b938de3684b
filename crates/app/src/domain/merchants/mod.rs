//! Merchants

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::MerchantsServiceError;
pub use service::*;
