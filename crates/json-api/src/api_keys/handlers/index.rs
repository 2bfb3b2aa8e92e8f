//! List API Keys Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    api_keys::{errors::into_status_error, responses::ApiKeyMetadataResponse},
    extensions::*,
    state::State,
};

/// List API Keys Handler
///
/// Returns the caller's API keys in their current tier, newest first.
#[endpoint(
    tags("api-keys"),
    summary = "List API Keys",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<ApiKeyMetadataResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let keys = state
        .app
        .api_keys
        .list_api_keys(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(keys.into_iter().map(Into::into).collect()))
}
