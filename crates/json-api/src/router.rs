//! App Router

use salvo::Router;

use crate::{api_keys, auth, healthcheck, models, tiers, tokens};

/// Every route the server exposes, without state or global middleware.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(
            Router::with_path("v1")
                .push(Router::with_path("tiers/lookup").post(tiers::lookup::handler))
                .push(
                    Router::new()
                        .hoop(auth::middleware::handler)
                        .push(Router::with_path("models").get(models::index::handler))
                        .push(
                            Router::with_path("tokens")
                                .post(tokens::issue::handler)
                                .delete(tokens::revoke::handler),
                        )
                        .push(
                            Router::with_path("api-keys")
                                .get(api_keys::index::handler)
                                .post(api_keys::create::handler)
                                .push(Router::with_path("{id}").get(api_keys::get::handler)),
                        ),
                ),
        )
}

#[cfg(test)]
mod tests {
    use maas_app::{
        identity::{IdentityError, MockIdentityService},
        tiers::{MockTierResolver, Tier},
    };
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::test_helpers::TestState;

    use super::*;

    fn service(state: TestState) -> Service {
        Service::new(Router::new().hoop(inject(state.build())).push(app_router()))
    }

    #[tokio::test]
    async fn test_health_needs_no_credentials() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity.expect_authenticate().never();

        let res = TestClient::get("http://example.com/health")
            .send(&service(TestState::default().identity(identity)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_tier_lookup_needs_no_credentials() -> TestResult {
        let mut identity = MockIdentityService::new();
        let mut tiers = MockTierResolver::new();

        identity.expect_authenticate().never();
        tiers.expect_tier_for_groups().once().return_once(|_| {
            Ok(Tier {
                name: "free".to_owned(),
                display_name: Some("Free".to_owned()),
                description: None,
                level: 0,
                groups: smallvec!["system:authenticated".to_owned()],
            })
        });

        let mut res = TestClient::post("http://example.com/v1/tiers/lookup")
            .json(&json!({ "groups": ["system:authenticated"] }))
            .send(&service(TestState::default().identity(identity).tiers(tiers)))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body, json!({ "tier": "free", "displayName": "Free" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_protected_routes_reject_missing_token() -> TestResult {
        let service = service(TestState::default());

        for (method, path) in [
            ("GET", "/v1/models"),
            ("POST", "/v1/tokens"),
            ("DELETE", "/v1/tokens"),
            ("GET", "/v1/api-keys"),
            ("POST", "/v1/api-keys"),
            ("GET", "/v1/api-keys/key-1"),
        ] {
            let url = format!("http://example.com{path}");
            let client = match method {
                "POST" => TestClient::post(url),
                "DELETE" => TestClient::delete(url),
                _ => TestClient::get(url),
            };

            let res = client.send(&service).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{method} {path}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_token_returns_401() -> TestResult {
        let mut identity = MockIdentityService::new();

        identity
            .expect_authenticate()
            .once()
            .withf(|token| token == "expired")
            .return_once(|_| Err(IdentityError::Unauthenticated));

        let res = TestClient::get("http://example.com/v1/models")
            .add_header("authorization", "Bearer expired", true)
            .send(&service(TestState::default().identity(identity)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
