use axum::{extract::Path, routing::get, Json, Router};

use dsm_slo::Result;
use dsm_storage::{
    provider::{ConfigTypes, ListParams, Provider, ProviderStore},
    List,
};

use crate::{valid::Valid, AppState};

pub fn new_router(state: AppState) -> Router {
    Router::new()
        .route("/providers", get(list_provider))
        .route("/providers/{id}", get(get_provider))
        .route("/providers/{id}/config_types", get(get_config_types))
        .with_state(state)
}

async fn list_provider(
    app: AppState,
    Valid(list_params): Valid<ListParams>,
) -> Result<Json<List<Provider>>> {
    let result = app.store.provider.list_provider(&list_params).await?;
    Ok(result.into())
}

async fn get_provider(
    app: AppState,
    Path(id): Path<String>,
) -> Result<Json<Provider>> {
    let result = app.store.provider.get_provider(&id).await?;
    Ok(result.into())
}

async fn get_config_types(
    app: AppState,
    Path(id): Path<String>,
) -> Result<Json<ConfigTypes>> {
    let (data, exhaustive) = app.store.provider.get_config_types(&id).await?;
    Ok(ConfigTypes { data, exhaustive }.into())
}
