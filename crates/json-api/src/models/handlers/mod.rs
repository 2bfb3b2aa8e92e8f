//! Model Handlers

pub(crate) mod index;
