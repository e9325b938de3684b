//! Orders
//!
//! An order starts life as a customer's cart (`pending`), is converted to a
//! purchase by checkout (`paid`), and ends either fulfilled (`complete`) or
//! cancelled (`cancel`).

pub mod checkout;
pub mod errors;
pub mod models;
mod repositories;
pub mod service;

pub use checkout::{CheckoutField, CheckoutFields, CheckoutRejection, FieldError};
pub use errors::OrdersServiceError;
pub use service::*;
