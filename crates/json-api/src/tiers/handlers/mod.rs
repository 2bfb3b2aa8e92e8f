//! Tier Handlers

pub(crate) mod lookup;
