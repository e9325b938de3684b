//! Order Items endpoints

mod handlers;

pub(crate) use handlers::*;
