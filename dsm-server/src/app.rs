use std::{ops::Deref, sync::Arc};

use anyhow::Result;
use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;
use sqlx::MySqlPool;
use tracing::info;

use dsm_slo::errors;
use dsm_storage::{connector::mariadb::ConnectorImpl, provider::mariadb::ProviderImpl};

use crate::AppConfig;

pub struct App {
    pub config: AppConfig,
    pub store: Store,
}

impl App {
    pub fn new(pool: MySqlPool, config: AppConfig) -> Result<Self> {
        info!("initializing stores...");
        let store = Store::new(pool);
        info!("stores successfully initialized!");
        Ok(Self { config, store })
    }
}

pub struct Store {
    pub provider: ProviderImpl,
    pub connector: ConnectorImpl,
}

impl Store {
    pub fn new(pool: MySqlPool) -> Self {
        let provider = ProviderImpl::new(pool.clone());
        let connector = ConnectorImpl::new(pool);
        Self {
            provider,
            connector,
        }
    }
}

#[derive(Clone)]
pub struct AppState(pub Arc<App>);

// deref so you can still access the inner fields easily
impl Deref for AppState {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AppState
where
    Self: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = errors::WithBacktrace;
    async fn from_request_parts(
        _: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_ref(state))
    }
}
