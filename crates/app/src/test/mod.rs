//! Shared test infrastructure.

mod db;
mod fixtures;

pub(crate) use db::TestDb;
pub(crate) use fixtures::*;
