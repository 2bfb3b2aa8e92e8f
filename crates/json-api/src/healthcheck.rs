//! Liveness endpoint.

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Liveness report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,

    /// Server build version
    pub version: String,
}

impl HealthResponse {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Liveness check
///
/// Reports the process as up without reaching the cluster or the key store.
#[endpoint(tags("health"), summary = "Liveness check")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn reports_healthy_with_build_version() -> TestResult {
        let router = Router::new().push(Router::with_path("health").get(handler));

        let mut res = TestClient::get("http://example.com/health")
            .send(&Service::new(router))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: HealthResponse = res.take_json().await?;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));

        Ok(())
    }
}
