//! List Models Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use maas_app::models::{Model, ModelDetails};

use crate::{extensions::*, models::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelDetailsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genai_use_case: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<ModelDetails> for ModelDetailsResponse {
    fn from(details: ModelDetails) -> Self {
        Self {
            genai_use_case: details.genai_use_case,
            description: details.description,
            display_name: details.display_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ModelResponse {
    /// Model identifier clients send in inference requests
    pub id: String,

    /// Always `"model"`
    pub object: String,

    /// Creation time, unix seconds
    pub created: i64,

    /// Namespace serving the model
    pub owned_by: String,

    /// Inference endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub ready: bool,

    #[serde(
        rename = "modelDetails",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<ModelDetailsResponse>,
}

impl From<Model> for ModelResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            object: model.object,
            created: model.created,
            owned_by: model.owned_by,
            url: model.url,
            ready: model.ready,
            details: model.details.map(Into::into),
        }
    }
}

/// OpenAI-compatible list envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ModelsResponse {
    /// Always `"list"`
    pub object: String,

    pub data: Vec<ModelResponse>,
}

/// List Models Handler
///
/// Returns the models served behind this instance's gateway.
#[endpoint(
    tags("models"),
    summary = "List Models",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ModelsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_or_401()?;

    let models = state
        .app
        .models
        .list_available_models()
        .await
        .map_err(into_status_error)?;

    Ok(Json(ModelsResponse {
        object: "list".to_owned(),
        data: models.into_iter().map(Into::into).collect(),
    }))
}
