//! Get API Key Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    api_keys::{errors::into_status_error, responses::ApiKeyMetadataResponse},
    extensions::*,
    state::State,
};

/// Get API Key Handler
///
/// Returns one of the caller's API keys by id.
#[endpoint(
    tags("api-keys"),
    summary = "Get API Key",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "API key found"),
        (status_code = StatusCode::NOT_FOUND, description = "API key not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ApiKeyMetadataResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let key = state
        .app
        .api_keys
        .get_api_key(user, &id.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(key.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use maas_app::api_keys::{ApiKeyMetadata, ApiKeysServiceError, MockApiKeysService};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_USERNAME, TestState, authenticated_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("api-keys/{id}").get(handler)
    }

    #[tokio::test]
    async fn test_get_api_key() -> TestResult {
        let key = ApiKeyMetadata {
            id: "key-1".to_owned(),
            username: TEST_USERNAME.to_owned(),
            name: "ci".to_owned(),
            description: None,
            namespace: "acme-tier-free".to_owned(),
            creation_date: Timestamp::from_second(1_700_000_000)?,
            expiration_date: None,
        };

        let mut api_keys = MockApiKeysService::new();

        api_keys
            .expect_get_api_key()
            .once()
            .withf(|user, id| user.username == TEST_USERNAME && id == "key-1")
            .return_once(move |_, _| Ok(key));

        let mut res = TestClient::get("http://example.com/api-keys/key-1")
            .send(&authenticated_service(
                TestState::default().api_keys(api_keys),
                route(),
            ))
            .await;

        let body: ApiKeyMetadataResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.id, "key-1");
        assert_eq!(body.expiration_date, None);
        assert_eq!(body.status, "expired");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_key_returns_404() -> TestResult {
        let mut api_keys = MockApiKeysService::new();

        api_keys
            .expect_get_api_key()
            .once()
            .return_once(|_, _| Err(ApiKeysServiceError::NotFound));

        let res = TestClient::get("http://example.com/api-keys/missing")
            .send(&authenticated_service(
                TestState::default().api_keys(api_keys),
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
