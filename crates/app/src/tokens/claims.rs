//! Claims read back from issued JWTs.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use serde::Deserialize;

use crate::tokens::TokenError;

const LOCAL_JTI_BYTES: usize = 16;

/// The registered claims the issuer relies on.
///
/// The signature is not checked; the token was just minted by the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MalformedToken`] if the token is not a
    /// three-segment JWT with a base64url JSON payload.
    pub fn from_jwt(token: &str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');

        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(TokenError::MalformedToken(
                    "expected three dot-separated segments".to_owned(),
                ));
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|error| TokenError::MalformedToken(format!("payload is not base64url: {error}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|error| TokenError::MalformedToken(format!("payload is not JSON: {error}")))
    }

    /// The `jti` claim, when present and non-empty.
    #[must_use]
    pub fn jti(&self) -> Option<&str> {
        self.jti.as_deref().filter(|jti| !jti.is_empty())
    }
}

/// A random 128-bit identifier for tokens minted without a `jti`.
#[must_use]
pub fn generate_local_jti() -> String {
    let mut bytes = [0_u8; LOCAL_JTI_BYTES];
    OsRng.fill_bytes(&mut bytes);

    hex::encode(bytes)
}

#[cfg(test)]
pub(crate) fn encode_test_jwt(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

    format!("{header}.{payload}.c2lnbmF0dXJl")
}
