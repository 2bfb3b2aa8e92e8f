//! Wire types for the Kubernetes objects the service reads and writes.
//!
//! Only the fields the service consumes are modelled; unknown fields are
//! ignored on decode.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Object metadata shared by every resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub labels: FxHashMap<String, String>,

    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub annotations: FxHashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub generation: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Timestamp>,
}

impl ObjectMeta {
    /// Metadata for a new object.
    #[must_use]
    pub fn named(
        name: impl Into<String>,
        namespace: Option<String>,
        labels: FxHashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace,
            labels,
            ..Self::default()
        }
    }

    /// The namespace, or the empty string for cluster-scoped objects.
    #[must_use]
    pub fn namespace_or_default(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde skip_serializing_if passes a reference"
)]
fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// A core `v1` `ConfigMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub data: FxHashMap<String, String>,
}

/// A core `v1` `Namespace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    #[serde(default = "core_api_version")]
    pub api_version: String,

    #[serde(default = "namespace_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,
}

impl Namespace {
    /// A namespace ready to be created.
    #[must_use]
    pub fn new(name: impl Into<String>, labels: FxHashMap<String, String>) -> Self {
        Self {
            api_version: core_api_version(),
            kind: namespace_kind(),
            metadata: ObjectMeta::named(name, None, labels),
        }
    }
}

/// A core `v1` `ServiceAccount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    #[serde(default = "core_api_version")]
    pub api_version: String,

    #[serde(default = "service_account_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,
}

impl ServiceAccount {
    /// A service account ready to be created in `namespace`.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        labels: FxHashMap<String, String>,
    ) -> Self {
        Self {
            api_version: core_api_version(),
            kind: service_account_kind(),
            metadata: ObjectMeta::named(name, Some(namespace.into()), labels),
        }
    }
}

fn core_api_version() -> String {
    "v1".to_owned()
}

fn namespace_kind() -> String {
    "Namespace".to_owned()
}

fn service_account_kind() -> String {
    "ServiceAccount".to_owned()
}

fn authentication_api_version() -> String {
    "authentication.k8s.io/v1".to_owned()
}

/// An `authentication.k8s.io/v1` `TokenRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default = "authentication_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    pub spec: TokenRequestSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TokenRequestStatus>,
}

impl TokenRequest {
    /// A request for a token valid for `audiences` over `expiration_seconds`.
    #[must_use]
    pub fn new(audiences: Vec<String>, expiration_seconds: i64) -> Self {
        Self {
            api_version: authentication_api_version(),
            kind: "TokenRequest".to_owned(),
            spec: TokenRequestSpec {
                audiences,
                expiration_seconds,
            },
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestSpec {
    #[serde(default)]
    pub audiences: Vec<String>,

    pub expiration_seconds: i64,
}

/// Populated by the API server on a successful `TokenRequest`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestStatus {
    pub token: String,
    pub expiration_timestamp: Timestamp,
}

impl std::fmt::Debug for TokenRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequestStatus")
            .field("token", &"<redacted>")
            .field("expiration_timestamp", &self.expiration_timestamp)
            .finish()
    }
}

/// An `authentication.k8s.io/v1` `TokenReview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReview {
    #[serde(default = "authentication_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    pub spec: TokenReviewSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TokenReviewStatus>,
}

impl TokenReview {
    /// A review of `token`, optionally scoped to `audiences`.
    #[must_use]
    pub fn new(token: impl Into<String>, audiences: Vec<String>) -> Self {
        Self {
            api_version: authentication_api_version(),
            kind: "TokenReview".to_owned(),
            spec: TokenReviewSpec {
                token: token.into(),
                audiences,
            },
            status: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReviewSpec {
    pub token: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
}

impl std::fmt::Debug for TokenReviewSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenReviewSpec")
            .field("token", &"<redacted>")
            .field("audiences", &self.audiences)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReviewStatus {
    #[serde(default)]
    pub authenticated: bool,

    #[serde(default)]
    pub user: UserInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub uid: String,

    #[serde(default)]
    pub groups: Vec<String>,
}

/// A `serving.kserve.io/v1alpha1` `LLMInferenceService`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmInferenceService {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: LlmInferenceServiceSpec,

    #[serde(default)]
    pub status: LlmInferenceServiceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmInferenceServiceSpec {
    #[serde(default)]
    pub model: ModelSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<RouterSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewaySpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySpec {
    #[serde(default)]
    pub refs: Vec<ParentReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpRouteConfig>,
}

/// Either an inline route spec, references to existing routes, or neither
/// (in which case the route is managed by the inference controller).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRouteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<HttpRouteSpec>,

    #[serde(default)]
    pub refs: Vec<LocalObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    #[serde(default)]
    pub name: String,
}

/// A reference to a gateway, from a service or from a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentReference {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmInferenceServiceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub addresses: Vec<Addressable>,

    #[serde(default)]
    pub observed_generation: i64,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addressable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub status: Option<ConditionStatus>,
}

/// Condition status as published. Most controllers write a string, some a
/// boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionStatus {
    Flag(bool),
    Text(String),
}

impl ConditionStatus {
    /// `"True"` in any casing, or boolean `true`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

/// A `gateway.networking.k8s.io/v1` `HTTPRoute`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRoute {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: HttpRouteSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteSpec {
    #[serde(default)]
    pub parent_refs: Vec<ParentReference>,
}

/// Envelope returned by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Render a label selector for list calls, keys sorted for stable output.
#[must_use]
pub fn label_selector(labels: &FxHashMap<String, String>) -> String {
    let mut pairs: Vec<_> = labels.iter().collect();
    pairs.sort();

    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn condition_status_accepts_strings_and_booleans() -> TestResult {
        let conditions: Vec<Condition> = serde_json::from_value(json!([
            { "type": "Ready", "status": "True" },
            { "type": "Routed", "status": true },
            { "type": "Scheduled", "status": "false" },
            { "type": "Pending" },
        ]))?;

        let truth: Vec<bool> = conditions
            .iter()
            .map(|condition| condition.status.as_ref().is_some_and(ConditionStatus::is_true))
            .collect();

        assert_eq!(truth, vec![true, true, false, false]);

        Ok(())
    }

    #[test]
    fn inference_service_decodes_router_variants() -> TestResult {
        let service: LlmInferenceService = serde_json::from_value(json!({
            "metadata": {
                "name": "granite",
                "namespace": "llm",
                "generation": 2,
                "creationTimestamp": "2025-01-02T03:04:05Z"
            },
            "spec": {
                "model": { "name": "ibm/granite" },
                "router": {
                    "gateway": { "refs": [{ "name": "maas-default-gateway", "namespace": "openshift-ingress" }] },
                    "route": { "http": { "refs": [{ "name": "granite-route" }] } }
                }
            },
            "status": {
                "url": "https://example.com/llm/granite",
                "observedGeneration": 2,
                "conditions": [{ "type": "Ready", "status": "True" }]
            }
        }))?;

        let router = service.spec.router.as_ref().ok_or("router missing")?;
        let gateway = router.gateway.as_ref().ok_or("gateway missing")?;

        assert_eq!(gateway.refs.len(), 1);
        assert_eq!(service.spec.model.name.as_deref(), Some("ibm/granite"));
        assert_eq!(service.metadata.generation, 2);
        assert_eq!(service.status.observed_generation, 2);
        assert!(service.metadata.creation_timestamp.is_some());

        Ok(())
    }

    #[test]
    fn namespace_serializes_without_empty_fields() -> TestResult {
        let namespace = Namespace::new("acme-tier-free", FxHashMap::default());
        let value = serde_json::to_value(&namespace)?;

        assert_eq!(
            value,
            json!({
                "apiVersion": "v1",
                "kind": "Namespace",
                "metadata": { "name": "acme-tier-free" }
            })
        );

        Ok(())
    }

    #[test]
    fn label_selector_is_sorted() {
        let mut labels = FxHashMap::default();
        labels.insert("b".to_owned(), "2".to_owned());
        labels.insert("a".to_owned(), "1".to_owned());

        assert_eq!(label_selector(&labels), "a=1,b=2");
    }
}
