//! Tier Errors

use salvo::http::StatusError;
use tracing::error;

use maas_app::tiers::TierError;

pub(crate) fn into_status_error(error: TierError) -> StatusError {
    match error {
        TierError::NoGroups => StatusError::bad_request().brief("groups must not be empty"),
        TierError::GroupNotFound(_) => StatusError::not_found().brief(error.to_string()),
        TierError::MissingConfiguration(_)
        | TierError::InvalidConfiguration(_)
        | TierError::NotLoaded => {
            error!("failed to resolve tier: {error}");

            StatusError::internal_server_error().brief("Tier configuration unavailable")
        }
    }
}
