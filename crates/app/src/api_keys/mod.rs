//! Named, long-lived credentials and their metadata.

mod errors;
mod models;
mod queries;
mod service;
mod store;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use store::*;
