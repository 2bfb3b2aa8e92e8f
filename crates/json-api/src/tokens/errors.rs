//! Token Errors

use salvo::http::StatusError;
use tracing::error;

use maas_app::{tiers::TierError, tokens::TokenError};

pub(crate) fn into_status_error(error: TokenError) -> StatusError {
    match &error {
        TokenError::Tier { username, source } => match source {
            TierError::NoGroups => {
                StatusError::bad_request().brief("caller has no groups to resolve a tier from")
            }
            TierError::GroupNotFound(_) => {
                StatusError::forbidden().brief("caller's groups do not map to any tier")
            }
            source => {
                error!(username, "failed to resolve tier: {source}");

                StatusError::internal_server_error().brief("Tier configuration unavailable")
            }
        },
        TokenError::InvalidUsername(_) | TokenError::InvalidTtl(_) => {
            StatusError::bad_request().brief(error.to_string())
        }
        TokenError::Namespace { source, .. }
        | TokenError::ServiceAccount { source, .. }
        | TokenError::Issuance { source, .. }
        | TokenError::Revocation { source, .. } => {
            error!("{error}: {source}");

            StatusError::internal_server_error().brief("Failed to process token request")
        }
        TokenError::MalformedToken(_) => {
            error!("{error}");

            StatusError::internal_server_error().brief("Failed to process token request")
        }
    }
}
