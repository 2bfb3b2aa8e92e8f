//! Gateway ownership checks.
//!
//! A service may declare its routing in four shapes. Each shape has its own
//! check; a service belongs to this instance when any check matches.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    cluster::{
        ClusterClient, HttpRoute, HttpRouteConfig, LlmInferenceService, ParentReference,
        label_selector,
    },
    models::GatewayRef,
};

const ROUTER_COMPONENT: &str = "llminferenceservice-router";
const ROUTER_PART_OF: &str = "llminferenceservice";

/// One way a service can attach to a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipCheck {
    /// `spec.router.gateway.refs` names the gateway.
    GatewayReference,
    /// An inline route spec has the gateway as a parent.
    InlineRoute,
    /// A referenced `HTTPRoute` has the gateway as a parent.
    ReferencedRoute,
    /// The controller-managed `HTTPRoute` has the gateway as a parent.
    ManagedRoute,
}

impl OwnershipCheck {
    /// Every check, in evaluation order.
    pub const ALL: [Self; 4] = [
        Self::GatewayReference,
        Self::InlineRoute,
        Self::ReferencedRoute,
        Self::ManagedRoute,
    ];

    /// Whether `service` attaches to `gateway` in this shape.
    pub async fn matches(
        self,
        service: &LlmInferenceService,
        gateway: &GatewayRef,
        cluster: &dyn ClusterClient,
    ) -> bool {
        let Some(router) = service.spec.router.as_ref() else {
            return false;
        };

        let namespace = service.metadata.namespace_or_default();
        let http = router.route.as_ref().and_then(|route| route.http.as_ref());

        match self {
            Self::GatewayReference => router
                .gateway
                .as_ref()
                .is_some_and(|spec| any_parent_matches(&spec.refs, gateway, namespace)),
            Self::InlineRoute => http
                .and_then(|http| http.spec.as_ref())
                .is_some_and(|spec| any_parent_matches(&spec.parent_refs, gateway, namespace)),
            Self::ReferencedRoute => match http {
                Some(http) => referenced_route_matches(http, gateway, namespace, cluster).await,
                None => false,
            },
            Self::ManagedRoute => match http {
                Some(http) if http.spec.is_none() && http.refs.is_empty() => {
                    managed_route_matches(service, gateway, namespace, cluster).await
                }
                _ => false,
            },
        }
    }
}

/// Whether any check places `service` behind `gateway`.
pub async fn is_owned(
    service: &LlmInferenceService,
    gateway: &GatewayRef,
    cluster: &dyn ClusterClient,
) -> bool {
    for check in OwnershipCheck::ALL {
        if check.matches(service, gateway, cluster).await {
            return true;
        }
    }

    false
}

fn any_parent_matches(refs: &[ParentReference], gateway: &GatewayRef, namespace: &str) -> bool {
    refs.iter()
        .any(|parent| gateway.matches(&parent.name, parent.namespace.as_deref(), namespace))
}

fn route_matches(route: &HttpRoute, gateway: &GatewayRef, namespace: &str) -> bool {
    any_parent_matches(&route.spec.parent_refs, gateway, namespace)
}

async fn referenced_route_matches(
    http: &HttpRouteConfig,
    gateway: &GatewayRef,
    namespace: &str,
    cluster: &dyn ClusterClient,
) -> bool {
    for reference in &http.refs {
        match cluster.get_http_route(namespace, &reference.name).await {
            Ok(route) if route_matches(&route, gateway, namespace) => return true,
            Ok(_) => {}
            Err(error) => {
                debug!(namespace, route = %reference.name, %error, "referenced route unavailable");
            }
        }
    }

    false
}

async fn managed_route_matches(
    service: &LlmInferenceService,
    gateway: &GatewayRef,
    namespace: &str,
    cluster: &dyn ClusterClient,
) -> bool {
    let selector = label_selector(&managed_route_labels(&service.metadata.name));

    match cluster.list_http_routes(namespace, &selector).await {
        Ok(routes) => routes
            .iter()
            .any(|route| route_matches(route, gateway, namespace)),
        Err(error) => {
            debug!(namespace, service = %service.metadata.name, %error, "failed to list managed routes");
            false
        }
    }
}

/// Labels the inference controller puts on the route it manages for
/// `service`.
#[must_use]
pub fn managed_route_labels(service: &str) -> FxHashMap<String, String> {
    [
        ("app.kubernetes.io/component", ROUTER_COMPONENT),
        ("app.kubernetes.io/name", service),
        ("app.kubernetes.io/part-of", ROUTER_PART_OF),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect()
}
