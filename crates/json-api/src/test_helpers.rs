//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use maas_app::{
    api_keys::MockApiKeysService,
    context::AppContext,
    identity::{MockIdentityService, UserContext},
    models::MockModelsService,
    tiers::MockTierResolver,
    tokens::MockTokenManager,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USERNAME: &str = "alice";

pub(crate) fn user() -> UserContext {
    UserContext {
        username: TEST_USERNAME.to_owned(),
        uid: "alice-uid".to_owned(),
        groups: vec!["system:authenticated".to_owned()],
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user(user());
    ctrl.call_next(req, depot, res).await;
}

/// Builds a [`State`] from mocks; services left unset reject every call.
#[derive(Default)]
pub(crate) struct TestState {
    identity: Option<MockIdentityService>,
    tiers: Option<MockTierResolver>,
    tokens: Option<MockTokenManager>,
    api_keys: Option<MockApiKeysService>,
    models: Option<MockModelsService>,
}

impl TestState {
    pub(crate) fn identity(mut self, identity: MockIdentityService) -> Self {
        self.identity = Some(identity);
        self
    }

    pub(crate) fn tiers(mut self, tiers: MockTierResolver) -> Self {
        self.tiers = Some(tiers);
        self
    }

    pub(crate) fn tokens(mut self, tokens: MockTokenManager) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub(crate) fn api_keys(mut self, api_keys: MockApiKeysService) -> Self {
        self.api_keys = Some(api_keys);
        self
    }

    pub(crate) fn models(mut self, models: MockModelsService) -> Self {
        self.models = Some(models);
        self
    }

    pub(crate) fn build(self) -> Arc<State> {
        State::from_app_context(AppContext::from_services(
            Arc::new(self.identity.unwrap_or_default()),
            Arc::new(self.tiers.unwrap_or_default()),
            Arc::new(self.tokens.unwrap_or_default()),
            Arc::new(self.api_keys.unwrap_or_default()),
            Arc::new(self.models.unwrap_or_default()),
        ))
    }
}

/// A service exposing `route` to an already authenticated [`user`].
pub(crate) fn authenticated_service(state: TestState, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state.build()))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service exposing `route` without authentication.
pub(crate) fn anonymous_service(state: TestState, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state.build())).push(route))
}
