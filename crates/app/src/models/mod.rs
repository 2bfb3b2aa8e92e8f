//! Discovery of the inference services routed through this instance's
//! gateway.

mod errors;
mod models;
mod ownership;
mod service;

pub use errors::*;
pub use models::*;
pub use ownership::*;
pub use service::*;
