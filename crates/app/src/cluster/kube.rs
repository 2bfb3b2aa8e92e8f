//! REST client for the Kubernetes API server.

use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use reqwest::{Certificate, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{
    ClusterClient, ClusterError, ConfigMap, HttpRoute, LlmInferenceService, Namespace,
    ServiceAccount, TokenRequest, TokenReview, resources::ObjectList,
};

/// Where the client's bearer token comes from.
#[derive(Debug, Clone)]
pub enum KubeCredentials {
    /// A fixed token, typically for local development.
    Static(String),

    /// A projected token file, re-read on every request so kubelet rotation
    /// is picked up.
    File(PathBuf),

    /// No authentication.
    Anonymous,
}

/// Configuration for connecting to the API server.
#[derive(Debug, Clone)]
pub struct KubeConfig {
    /// API server base URL, e.g. `"https://kubernetes.default.svc"`.
    pub api_url: String,

    /// How requests authenticate.
    pub credentials: KubeCredentials,

    /// PEM-encoded CA bundle to trust in addition to the system roots.
    pub ca_certificate: Option<Vec<u8>>,

    /// Skip TLS verification entirely.
    pub insecure_skip_tls_verify: bool,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP client for the Kubernetes API.
#[derive(Debug, Clone)]
pub struct KubeClient {
    config: KubeConfig,
    http: Client,
}

impl KubeClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA bundle is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: KubeConfig) -> Result<Self, ClusterError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify);

        if let Some(pem) = &config.ca_certificate {
            builder = builder.add_root_certificate(Certificate::from_pem(pem)?);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClusterError> {
        let url = format!("{}{path}", self.config.api_url.trim_end_matches('/'));
        let builder = self.http.request(method, url);

        let builder = match &self.config.credentials {
            KubeCredentials::Static(token) => builder.bearer_auth(token),
            KubeCredentials::File(path) => {
                let token = tokio::fs::read_to_string(path).await.map_err(|source| {
                    ClusterError::Credentials {
                        path: path.display().to_string(),
                        source,
                    }
                })?;

                builder.bearer_auth(token.trim())
            }
            KubeCredentials::Anonymous => builder,
        };

        Ok(builder)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, object: &str) -> Result<T, ClusterError> {
        let response = self.request(Method::GET, path).await?.send().await?;

        decode(response, object).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        object: &str,
        body: &B,
    ) -> Result<T, ClusterError> {
        let response = self
            .request(Method::POST, path)
            .await?
            .json(body)
            .send()
            .await?;

        decode(response, object).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, object: &str) -> Result<T, ClusterError> {
    let response = check_status(response, object).await?;

    Ok(response.json().await?)
}

async fn check_status(response: Response, object: &str) -> Result<Response, ClusterError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ClusterError::NotFound(object.to_owned())),
        StatusCode::CONFLICT => Err(ClusterError::AlreadyExists(object.to_owned())),
        status => {
            let text = response.text().await.unwrap_or_default();

            Err(ClusterError::UnexpectedResponse(format!(
                "request for {object} failed with status {status}: {text}"
            )))
        }
    }
}

#[async_trait]
impl ClusterClient for KubeClient {
    async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap, ClusterError> {
        self.get(
            &format!("/api/v1/namespaces/{namespace}/configmaps/{name}"),
            &format!("configmap {namespace}/{name}"),
        )
        .await
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError> {
        self.get(
            &format!("/api/v1/namespaces/{name}"),
            &format!("namespace {name}"),
        )
        .await
    }

    async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace, ClusterError> {
        debug!(namespace = %namespace.metadata.name, "creating namespace");

        self.post(
            "/api/v1/namespaces",
            &format!("namespace {}", namespace.metadata.name),
            namespace,
        )
        .await
    }

    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClusterError> {
        self.get(
            &format!("/api/v1/namespaces/{namespace}/serviceaccounts/{name}"),
            &format!("serviceaccount {namespace}/{name}"),
        )
        .await
    }

    async fn create_service_account(
        &self,
        account: &ServiceAccount,
    ) -> Result<ServiceAccount, ClusterError> {
        let namespace = account.metadata.namespace_or_default();

        debug!(namespace, name = %account.metadata.name, "creating service account");

        self.post(
            &format!("/api/v1/namespaces/{namespace}/serviceaccounts"),
            &format!("serviceaccount {namespace}/{}", account.metadata.name),
            account,
        )
        .await
    }

    async fn delete_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<(), ClusterError> {
        let response = self
            .request(
                Method::DELETE,
                &format!("/api/v1/namespaces/{namespace}/serviceaccounts/{name}"),
            )
            .await?
            .send()
            .await?;

        check_status(response, &format!("serviceaccount {namespace}/{name}")).await?;

        Ok(())
    }

    async fn create_token(
        &self,
        namespace: &str,
        service_account: &str,
        request: &TokenRequest,
    ) -> Result<TokenRequest, ClusterError> {
        self.post(
            &format!("/api/v1/namespaces/{namespace}/serviceaccounts/{service_account}/token"),
            &format!("serviceaccount {namespace}/{service_account}"),
            request,
        )
        .await
    }

    async fn review_token(&self, review: &TokenReview) -> Result<TokenReview, ClusterError> {
        self.post(
            "/apis/authentication.k8s.io/v1/tokenreviews",
            "tokenreview",
            review,
        )
        .await
    }

    async fn list_inference_services(&self) -> Result<Vec<LlmInferenceService>, ClusterError> {
        let list: ObjectList<LlmInferenceService> = self
            .get(
                "/apis/serving.kserve.io/v1alpha1/llminferenceservices",
                "llminferenceservices",
            )
            .await?;

        Ok(list.items)
    }

    async fn get_http_route(&self, namespace: &str, name: &str) -> Result<HttpRoute, ClusterError> {
        self.get(
            &format!("/apis/gateway.networking.k8s.io/v1/namespaces/{namespace}/httproutes/{name}"),
            &format!("httproute {namespace}/{name}"),
        )
        .await
    }

    async fn list_http_routes(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<HttpRoute>, ClusterError> {
        let response = self
            .request(
                Method::GET,
                &format!("/apis/gateway.networking.k8s.io/v1/namespaces/{namespace}/httproutes"),
            )
            .await?
            .query(&[("labelSelector", label_selector)])
            .send()
            .await?;

        let list: ObjectList<HttpRoute> =
            decode(response, &format!("httproutes in {namespace}")).await?;

        Ok(list.items)
    }
}
