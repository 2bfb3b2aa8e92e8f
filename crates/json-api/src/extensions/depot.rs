//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use maas_app::identity::UserContext;

const USER_DEPOT_KEY: &str = "maas.user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_user(&mut self, user: UserContext);

    fn user_or_401(&self) -> Result<&UserContext, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user(&mut self, user: UserContext) {
        self.insert(USER_DEPOT_KEY, user);
    }

    fn user_or_401(&self) -> Result<&UserContext, StatusError> {
        self.get::<UserContext>(USER_DEPOT_KEY)
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}
