//! Authentication errors.

use salvo::http::StatusError;
use tracing::error;

use maas_app::identity::IdentityError;

pub(crate) fn into_status_error(error: IdentityError) -> StatusError {
    match error {
        IdentityError::MissingToken => {
            StatusError::unauthorized().brief("Missing or invalid Authorization header")
        }
        IdentityError::Unauthenticated => StatusError::unauthorized().brief("Invalid token"),
        IdentityError::Review(source) => {
            error!("token review failed: {source}");

            StatusError::internal_server_error().brief("Failed to validate token")
        }
    }
}
