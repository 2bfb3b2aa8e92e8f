//! Short-lived credential issuance and revocation.

mod claims;
mod errors;
mod labels;
mod models;
mod names;
mod service;
mod ttl;

pub use claims::*;
pub use errors::*;
pub use labels::*;
pub use models::*;
pub use names::*;
pub use service::*;
pub use ttl::*;

/// Audience stamped on every credential minted for `tenant`.
#[must_use]
pub fn token_audience(tenant: &str) -> String {
    format!("{tenant}-sa")
}
