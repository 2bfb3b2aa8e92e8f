//! Discovered models.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cluster::{ConditionStatus, LlmInferenceService};

const GENAI_USE_CASE_ANNOTATION: &str = "opendatahub.io/genai-use-case";
const DESCRIPTION_ANNOTATION: &str = "openshift.io/description";
const DISPLAY_NAME_ANNOTATION: &str = "openshift.io/display-name";

/// The gateway this instance manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRef {
    pub name: String,
    pub namespace: String,
}

impl GatewayRef {
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Whether a reference named `name` in `namespace` points at this
    /// gateway. A missing or empty namespace means `default_namespace`.
    #[must_use]
    pub fn matches(&self, name: &str, namespace: Option<&str>, default_namespace: &str) -> bool {
        let namespace = namespace
            .filter(|namespace| !namespace.is_empty())
            .unwrap_or(default_namespace);

        name == self.name && namespace == self.namespace
    }
}

/// Optional presentation metadata taken from annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genai_use_case: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ModelDetails {
    /// `None` when none of the annotations are set.
    #[must_use]
    pub fn from_annotations(annotations: &FxHashMap<String, String>) -> Option<Self> {
        let annotation = |key: &str| {
            annotations
                .get(key)
                .filter(|value| !value.is_empty())
                .cloned()
        };

        let details = Self {
            genai_use_case: annotation(GENAI_USE_CASE_ANNOTATION),
            description: annotation(DESCRIPTION_ANNOTATION),
            display_name: annotation(DISPLAY_NAME_ANNOTATION),
        };

        (details != Self::default()).then_some(details)
    }
}

/// An entry in the OpenAI-compatible model listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,

    pub object: String,

    /// Unix seconds.
    pub created: i64,

    pub owned_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub ready: bool,

    #[serde(
        rename = "modelDetails",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<ModelDetails>,
}

impl From<&LlmInferenceService> for Model {
    fn from(service: &LlmInferenceService) -> Self {
        let metadata = &service.metadata;

        Self {
            id: model_id(service).to_owned(),
            object: "model".to_owned(),
            created: metadata
                .creation_timestamp
                .map(jiff::Timestamp::as_second)
                .unwrap_or_default(),
            owned_by: metadata.namespace_or_default().to_owned(),
            url: model_url(service).map(str::to_owned),
            ready: is_ready(service),
            details: ModelDetails::from_annotations(&metadata.annotations),
        }
    }
}

/// The explicit model name when set, else the resource name.
#[must_use]
pub fn model_id(service: &LlmInferenceService) -> &str {
    service
        .spec
        .model
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&service.metadata.name)
}

/// The status URL, else the first address with a URL.
#[must_use]
pub fn model_url(service: &LlmInferenceService) -> Option<&str> {
    let status = &service.status;

    status
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .or_else(|| {
            status
                .addresses
                .iter()
                .find_map(|address| address.url.as_deref().filter(|url| !url.is_empty()))
        })
}

/// Not being deleted, reconciled at the current generation, and every
/// condition true.
#[must_use]
pub fn is_ready(service: &LlmInferenceService) -> bool {
    let metadata = &service.metadata;
    let status = &service.status;

    if metadata.deletion_timestamp.is_some() {
        return false;
    }

    if metadata.generation > 0 && status.observed_generation != metadata.generation {
        return false;
    }

    !status.conditions.is_empty()
        && status.conditions.iter().all(|condition| {
            condition
                .status
                .as_ref()
                .is_some_and(ConditionStatus::is_true)
        })
}
