//! Caller identity resolved from bearer tokens.

mod errors;
mod models;
mod service;

pub use errors::*;
pub use models::*;
pub use service::*;
