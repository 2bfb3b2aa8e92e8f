//! Tier-based credential issuance and model discovery for a multi-tenant
//! model-serving platform.

pub mod api_keys;
pub mod cluster;
pub mod context;
pub mod database;
pub mod identity;
pub mod models;
pub mod tiers;
pub mod tokens;

#[cfg(test)]
mod test;
