//! Service account naming.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::tokens::TokenError;

const MAX_NAME_LEN: usize = 63;
const SUFFIX_LEN: usize = 8;

#[expect(clippy::expect_used, reason = "literal pattern")]
static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9-]+").expect("valid pattern"));

#[expect(clippy::expect_used, reason = "literal pattern")]
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new("-+").expect("valid pattern"));

/// Derive a DNS-1123 label from `username`.
///
/// The sanitised base is suffixed with a hash of the original username so
/// that distinct usernames sanitising to the same base stay distinct.
///
/// # Errors
///
/// Returns [`TokenError::InvalidUsername`] if nothing usable remains after
/// sanitising.
pub fn service_account_name(username: &str) -> Result<String, TokenError> {
    let lowered = username.to_lowercase();
    let replaced = INVALID_CHARS.replace_all(&lowered, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    let mut base = collapsed.trim_matches('-').to_owned();

    if base.is_empty() {
        return Err(TokenError::InvalidUsername(username.to_owned()));
    }

    let digest = hex::encode(Sha256::digest(username.as_bytes()));
    let suffix: String = digest.chars().take(SUFFIX_LEN).collect();

    let max_base = MAX_NAME_LEN - 1 - SUFFIX_LEN;
    if base.len() > max_base {
        // ASCII only at this point.
        base.truncate(max_base);
        base = base.trim_matches('-').to_owned();
    }

    Ok(format!("{base}-{suffix}"))
}
