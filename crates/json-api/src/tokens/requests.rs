//! Token request and response bodies.

use jiff::SignedDuration;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};

use maas_app::tokens::{Credential, format_ttl, from_seconds, parse_ttl};

use crate::tokens::errors::into_status_error;

/// A lifetime given as a duration string (`"4h"`, `"1h30m"`) or seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TtlValue {
    Seconds(f64),
    Text(String),
}

impl TtlValue {
    fn to_duration(&self) -> Option<Result<SignedDuration, maas_app::tokens::TokenError>> {
        match self {
            Self::Seconds(seconds) => Some(from_seconds(*seconds)),
            Self::Text(text) if text.trim().is_empty() => None,
            Self::Text(text) => Some(parse_ttl(text.trim())),
        }
    }
}

/// The requested lifetime, or `default` when none was given.
pub(crate) fn resolve_ttl(
    value: Option<&TtlValue>,
    default: SignedDuration,
) -> Result<SignedDuration, StatusError> {
    match value.and_then(TtlValue::to_duration) {
        Some(ttl) => ttl.map_err(into_status_error),
        None => Ok(default),
    }
}

/// Body of `POST /tokens`; may be empty.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IssueTokenRequest {
    #[serde(default, alias = "ttl")]
    pub expiration: Option<TtlValue>,
}

/// An issued credential. The token is shown once.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    /// Bearer token
    pub token: String,

    /// Lifetime, e.g. `"4h0m0s"`
    pub expiration: String,

    /// Expiry, unix seconds
    pub expires_at: i64,

    /// Token identifier
    pub jti: String,
}

impl From<&Credential> for TokenResponse {
    fn from(credential: &Credential) -> Self {
        Self {
            token: credential.token.expose().to_owned(),
            expiration: format_ttl(credential.ttl),
            expires_at: credential.expires_at.as_second(),
            jti: credential.jti.clone(),
        }
    }
}
