//! Revoke Tokens Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{api_keys::errors::into_status_error, extensions::*, state::State};

/// Revoke Tokens Handler
///
/// Invalidates every token and API key the caller holds in their current
/// tier and marks the recorded API keys as expired.
#[endpoint(
    tags("tokens"),
    summary = "Revoke Tokens",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Credentials revoked"),
    ),
)]
#[tracing::instrument(
    name = "tokens.revoke",
    skip(depot),
    fields(username = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    tracing::Span::current().record("username", user.username.as_str());

    state
        .app
        .api_keys
        .revoke_all(user)
        .await
        .map_err(into_status_error)?;

    tracing::info!("revoked all credentials");

    Ok(StatusCode::NO_CONTENT)
}
