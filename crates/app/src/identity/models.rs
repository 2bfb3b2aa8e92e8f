//! Identity models.

use serde::{Deserialize, Serialize};

/// The authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub username: String,
    pub uid: String,
    pub groups: Vec<String>,
}
