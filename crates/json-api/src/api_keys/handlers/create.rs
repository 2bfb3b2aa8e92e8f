//! Create API Key Handler

use std::sync::Arc;

use salvo::prelude::*;
use serde::Deserialize;

use maas_app::{api_keys::CreateApiKey, tokens::DEFAULT_NAMED_TTL};

use crate::{
    api_keys::{errors::into_status_error, responses::ApiKeyResponse},
    extensions::*,
    payload::json_or_default,
    state::State,
    tokens::requests::{TtlValue, resolve_ttl},
};

#[derive(Debug, Default, Deserialize)]
struct CreateApiKeyRequest {
    #[serde(default)]
    name: String,

    #[serde(default)]
    description: Option<String>,

    #[serde(default, alias = "ttl")]
    expiration: Option<TtlValue>,
}

/// Create API Key Handler
///
/// Issues a named, long-lived credential and records its metadata.
/// `expiration` defaults to thirty days.
#[endpoint(
    tags("api-keys"),
    summary = "Create API Key",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "API key issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing name or invalid expiration"),
        (status_code = StatusCode::FORBIDDEN, description = "Caller has no tier"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApiKeyResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let request: CreateApiKeyRequest = json_or_default(req).await?;

    if request.name.trim().is_empty() {
        return Err(StatusError::bad_request().brief("name is required"));
    }

    let ttl = resolve_ttl(request.expiration.as_ref(), DEFAULT_NAMED_TTL)?;

    let issued = state
        .app
        .api_keys
        .create_api_key(
            user,
            CreateApiKey {
                name: request.name.trim().to_owned(),
                description: request.description.filter(|text| !text.trim().is_empty()),
                ttl,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(issued.into()))
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use maas_app::{
        api_keys::{ApiKeysServiceError, IssuedApiKey, MetadataStoreError, MockApiKeysService},
        tokens::{BearerToken, Credential},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USERNAME, TestState, authenticated_service};

    use super::*;

    fn issued(
        name: &str,
        description: Option<&str>,
        ttl: SignedDuration,
    ) -> Result<IssuedApiKey, jiff::Error> {
        let issued_at = Timestamp::from_second(1_700_000_000)?;

        Ok(IssuedApiKey {
            credential: Credential {
                token: BearerToken::new("sa-token".to_owned()),
                jti: "key-1".to_owned(),
                issued_at,
                expires_at: issued_at.checked_add(ttl)?,
                ttl,
                namespace: "acme-tier-free".to_owned(),
                service_account: "alice-0123abcd".to_owned(),
            },
            name: name.to_owned(),
            description: description.map(str::to_owned),
        })
    }

    fn route() -> Router {
        Router::with_path("api-keys").post(handler)
    }

    #[tokio::test]
    async fn test_create_api_key_with_default_expiration() -> TestResult {
        let key = issued("ci", Some("runner"), DEFAULT_NAMED_TTL)?;
        let mut api_keys = MockApiKeysService::new();

        api_keys
            .expect_create_api_key()
            .once()
            .withf(|user, request| {
                user.username == TEST_USERNAME
                    && request.name == "ci"
                    && request.description.as_deref() == Some("runner")
                    && request.ttl == DEFAULT_NAMED_TTL
            })
            .return_once(move |_, _| Ok(key));

        let mut res = TestClient::post("http://example.com/api-keys")
            .json(&json!({ "name": "ci", "description": "runner" }))
            .send(&authenticated_service(
                TestState::default().api_keys(api_keys),
                route(),
            ))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            body,
            json!({
                "token": "sa-token",
                "expiration": "720h0m0s",
                "expiresAt": 1_702_592_000,
                "jti": "key-1",
                "name": "ci",
                "description": "runner"
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_api_key_with_numeric_ttl() -> TestResult {
        let key = issued("batch", None, SignedDuration::from_hours(2))?;
        let mut api_keys = MockApiKeysService::new();

        api_keys
            .expect_create_api_key()
            .once()
            .withf(|_, request| {
                request.ttl == SignedDuration::from_hours(2) && request.description.is_none()
            })
            .return_once(move |_, _| Ok(key));

        let mut res = TestClient::post("http://example.com/api-keys")
            .json(&json!({ "name": "batch", "ttl": 7200 }))
            .send(&authenticated_service(
                TestState::default().api_keys(api_keys),
                route(),
            ))
            .await;

        let body: ApiKeyResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.expiration, "2h0m0s");
        assert_eq!(body.description, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_name_returns_400() -> TestResult {
        let mut api_keys = MockApiKeysService::new();

        api_keys.expect_create_api_key().never();

        let res = TestClient::post("http://example.com/api-keys")
            .json(&json!({ "description": "no name" }))
            .send(&authenticated_service(
                TestState::default().api_keys(api_keys),
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unrecorded_key_returns_500() -> TestResult {
        let mut api_keys = MockApiKeysService::new();

        api_keys.expect_create_api_key().once().return_once(|_, _| {
            Err(ApiKeysServiceError::Persist(MetadataStoreError::Invalid(
                "duplicate id".to_owned(),
            )))
        });

        let res = TestClient::post("http://example.com/api-keys")
            .json(&json!({ "name": "ci" }))
            .send(&authenticated_service(
                TestState::default().api_keys(api_keys),
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
