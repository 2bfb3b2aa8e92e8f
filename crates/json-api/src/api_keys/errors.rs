//! API Key Errors

use salvo::http::StatusError;
use tracing::error;

use maas_app::api_keys::ApiKeysServiceError;

pub(crate) fn into_status_error(error: ApiKeysServiceError) -> StatusError {
    match error {
        ApiKeysServiceError::NotFound => StatusError::not_found().brief("API key not found"),
        ApiKeysServiceError::MissingName => StatusError::bad_request().brief(error.to_string()),
        ApiKeysServiceError::Token(error) => crate::tokens::errors::into_status_error(error),
        ApiKeysServiceError::Persist(source) => {
            error!("api key issued but not recorded: {source}");

            StatusError::internal_server_error()
                .brief("API key was issued but could not be recorded")
        }
        ApiKeysServiceError::Store(source) => {
            error!("api key storage failed: {source}");

            StatusError::internal_server_error().brief("Failed to read API keys")
        }
        ApiKeysServiceError::MetadataStale { namespace, source } => {
            error!(namespace, "api key metadata is stale after revocation: {source}");

            StatusError::internal_server_error()
                .brief("Credentials were revoked but their API key records could not be updated")
        }
    }
}
