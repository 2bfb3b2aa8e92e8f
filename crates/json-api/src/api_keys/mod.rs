//! API Keys

pub(crate) mod errors;
mod handlers;
mod responses;

pub(crate) use handlers::*;
