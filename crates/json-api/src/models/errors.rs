//! Model Errors

use salvo::http::StatusError;
use tracing::error;

use maas_app::models::DiscoveryError;

pub(crate) fn into_status_error(error: DiscoveryError) -> StatusError {
    match error {
        DiscoveryError::List(source) => {
            error!("failed to list inference services: {source}");

            StatusError::internal_server_error().brief("Failed to list models")
        }
    }
}
