//! Tier Lookup Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, tiers::errors::into_status_error};

/// Tier Lookup Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TierLookupRequest {
    /// Groups of the caller being classified
    pub groups: Vec<String>,
}

/// Tier Lookup Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TierLookupResponse {
    /// Tier name
    pub tier: String,

    /// Human readable tier name
    pub display_name: String,
}

/// Tier Lookup Handler
///
/// Resolves the highest-level tier any of the groups belongs to.
#[endpoint(
    tags("tiers"),
    summary = "Look up a tier by groups",
    responses(
        (status_code = StatusCode::OK, description = "Tier resolved"),
        (status_code = StatusCode::BAD_REQUEST, description = "No groups provided"),
        (status_code = StatusCode::NOT_FOUND, description = "No tier matches the groups"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<TierLookupRequest>,
    depot: &mut Depot,
) -> Result<Json<TierLookupResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tier = state
        .app
        .tiers
        .tier_for_groups(&json.into_inner().groups)
        .map_err(into_status_error)?;

    Ok(Json(TierLookupResponse {
        display_name: tier.display_name().to_owned(),
        tier: tier.name,
    }))
}

#[cfg(test)]
mod tests {
    use maas_app::tiers::{MockTierResolver, Tier, TierError};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::test_helpers::{TestState, anonymous_service};

    use super::*;

    fn make_service(tiers: MockTierResolver) -> Service {
        anonymous_service(
            TestState::default().tiers(tiers),
            Router::with_path("tiers/lookup").post(handler),
        )
    }

    fn premium() -> Tier {
        Tier {
            name: "premium".to_owned(),
            display_name: Some("Premium".to_owned()),
            description: None,
            level: 10,
            groups: smallvec!["premium-users".to_owned()],
        }
    }

    #[tokio::test]
    async fn test_lookup_returns_tier() -> TestResult {
        let mut tiers = MockTierResolver::new();

        tiers
            .expect_tier_for_groups()
            .once()
            .withf(|groups| groups == ["system:authenticated", "premium-users"])
            .return_once(|_| Ok(premium()));

        let mut res = TestClient::post("http://example.com/tiers/lookup")
            .json(&json!({ "groups": ["system:authenticated", "premium-users"] }))
            .send(&make_service(tiers))
            .await;

        let body: TierLookupResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.tier, "premium");
        assert_eq!(body.display_name, "Premium");

        Ok(())
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_name() -> TestResult {
        let mut tiers = MockTierResolver::new();

        tiers.expect_tier_for_groups().once().return_once(|_| {
            Ok(Tier {
                display_name: None,
                ..premium()
            })
        });

        let mut res = TestClient::post("http://example.com/tiers/lookup")
            .json(&json!({ "groups": ["premium-users"] }))
            .send(&make_service(tiers))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, json!({ "tier": "premium", "displayName": "premium" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_groups_return_404() -> TestResult {
        let mut tiers = MockTierResolver::new();

        tiers
            .expect_tier_for_groups()
            .once()
            .return_once(|_| Err(TierError::GroupNotFound("groups [unknown]".to_owned())));

        let res = TestClient::post("http://example.com/tiers/lookup")
            .json(&json!({ "groups": ["unknown"] }))
            .send(&make_service(tiers))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_groups_return_400() -> TestResult {
        let mut tiers = MockTierResolver::new();

        tiers
            .expect_tier_for_groups()
            .once()
            .return_once(|_| Err(TierError::NoGroups));

        let res = TestClient::post("http://example.com/tiers/lookup")
            .json(&json!({ "groups": [] }))
            .send(&make_service(tiers))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_configuration_returns_500() -> TestResult {
        let mut tiers = MockTierResolver::new();

        tiers.expect_tier_for_groups().once().return_once(|_| {
            Err(TierError::MissingConfiguration(
                "tier-to-group-mapping".to_owned(),
            ))
        });

        let res = TestClient::post("http://example.com/tiers/lookup")
            .json(&json!({ "groups": ["system:authenticated"] }))
            .send(&make_service(tiers))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() -> TestResult {
        let mut tiers = MockTierResolver::new();

        tiers.expect_tier_for_groups().never();

        let res = TestClient::post("http://example.com/tiers/lookup")
            .json(&json!({ "groups": "premium-users" }))
            .send(&make_service(tiers))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
