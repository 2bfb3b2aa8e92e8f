//! Issue Token Handler

use std::sync::Arc;

use salvo::prelude::*;

use maas_app::tokens::DEFAULT_EPHEMERAL_TTL;

use crate::{
    extensions::*,
    payload::json_or_default,
    state::State,
    tokens::{
        errors::into_status_error,
        requests::{IssueTokenRequest, TokenResponse, resolve_ttl},
    },
};

/// Issue Token Handler
///
/// Issues a short-lived bearer token for the caller's tier. The body is
/// optional; `expiration` defaults to four hours.
#[endpoint(
    tags("tokens"),
    summary = "Issue Token",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Token issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid expiration"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller has no tier"),
    ),
)]
#[tracing::instrument(
    name = "tokens.issue",
    skip(req, depot, res),
    fields(username = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    tracing::Span::current().record("username", user.username.as_str());

    let request: IssueTokenRequest = json_or_default(req).await?;
    let ttl = resolve_ttl(request.expiration.as_ref(), DEFAULT_EPHEMERAL_TTL)?;

    let credential = state
        .app
        .tokens
        .generate_token(user, ttl)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(TokenResponse::from(&credential)))
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use maas_app::{
        tiers::TierError,
        tokens::{BearerToken, Credential, MockTokenManager, TokenError},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USERNAME, TestState, anonymous_service, authenticated_service};

    use super::*;

    fn credential(ttl: SignedDuration) -> Result<Credential, jiff::Error> {
        let issued_at = Timestamp::from_second(1_700_000_000)?;

        Ok(Credential {
            token: BearerToken::new("sa-token".to_owned()),
            jti: "jti-1".to_owned(),
            issued_at,
            expires_at: issued_at.checked_add(ttl)?,
            ttl,
            namespace: "acme-tier-free".to_owned(),
            service_account: "alice-0123abcd".to_owned(),
        })
    }

    fn route() -> Router {
        Router::with_path("tokens").post(handler)
    }

    #[tokio::test]
    async fn test_issue_token_with_default_expiration() -> TestResult {
        let issued = credential(DEFAULT_EPHEMERAL_TTL)?;
        let mut tokens = MockTokenManager::new();

        tokens
            .expect_generate_token()
            .once()
            .withf(|user, ttl| user.username == TEST_USERNAME && *ttl == DEFAULT_EPHEMERAL_TTL)
            .return_once(move |_, _| Ok(issued));

        let mut res = TestClient::post("http://example.com/tokens")
            .send(&authenticated_service(TestState::default().tokens(tokens), route()))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            body,
            json!({
                "token": "sa-token",
                "expiration": "4h0m0s",
                "expiresAt": 1_700_014_400,
                "jti": "jti-1"
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_issue_token_with_requested_expiration() -> TestResult {
        let issued = credential(SignedDuration::from_mins(90))?;
        let mut tokens = MockTokenManager::new();

        tokens
            .expect_generate_token()
            .once()
            .withf(|_, ttl| *ttl == SignedDuration::from_mins(90))
            .return_once(move |_, _| Ok(issued));

        let mut res = TestClient::post("http://example.com/tokens")
            .json(&json!({ "expiration": "1h30m" }))
            .send(&authenticated_service(TestState::default().tokens(tokens), route()))
            .await;

        let body: TokenResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.expiration, "1h30m0s");

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_expiration_returns_400() -> TestResult {
        let mut tokens = MockTokenManager::new();

        tokens.expect_generate_token().never();

        let res = TestClient::post("http://example.com/tokens")
            .json(&json!({ "expiration": "soon" }))
            .send(&authenticated_service(TestState::default().tokens(tokens), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_caller_without_tier_returns_403() -> TestResult {
        let mut tokens = MockTokenManager::new();

        tokens.expect_generate_token().once().return_once(|user, _| {
            Err(TokenError::Tier {
                username: user.username.clone(),
                source: TierError::GroupNotFound("groups [contractors]".to_owned()),
            })
        });

        let res = TestClient::post("http://example.com/tokens")
            .send(&authenticated_service(TestState::default().tokens(tokens), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_unauthenticated_request_returns_401() -> TestResult {
        let mut tokens = MockTokenManager::new();

        tokens.expect_generate_token().never();

        let res = TestClient::post("http://example.com/tokens")
            .send(&anonymous_service(TestState::default().tokens(tokens), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
