use axum::{extract::Path, routing::get, Json, Router};
use http::StatusCode;

use dsm_slo::Result;
use dsm_storage::{
    connector::{Connector, ConnectorStore, Content, ListParams},
    List,
};

use crate::{services::connector, valid::Valid, AppState};

pub fn new_router(state: AppState) -> Router {
    Router::new()
        .route("/connectors", get(list_connector).post(create_connector))
        .route(
            "/connectors/{id}",
            get(get_connector).delete(delete_connector),
        )
        .with_state(state)
}

async fn create_connector(
    app: AppState,
    Valid(Json(input)): Valid<Json<Content>>,
) -> Result<(StatusCode, Json<Connector>)> {
    let result =
        connector::create(&app.store.provider, &app.store.connector, input)
            .await?;
    Ok((StatusCode::CREATED, result.into()))
}

async fn list_connector(
    app: AppState,
    Valid(list_params): Valid<ListParams>,
) -> Result<Json<List<Connector>>> {
    let result = app.store.connector.list_connector(&list_params).await?;
    Ok(result.into())
}

async fn get_connector(
    app: AppState,
    Path(id): Path<String>,
) -> Result<Json<Connector>> {
    let result = app.store.connector.get_connector(&id).await?;
    Ok(result.into())
}

async fn delete_connector(
    app: AppState,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    app.store.connector.delete_connector(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
