pub mod mariadb;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockall::automock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use dsm_schema::NormalizedConfig;
use dsm_slo::Result;

use crate::{List, Pagination};

#[derive(
    Debug, Default, Deserialize, Serialize, ToSchema, PartialEq, Clone,
)]
pub struct Connector {
    pub id: String,
    pub connector_name: String,
    pub connector_description: String,
    pub connector_type: String,
    #[schema(value_type = Object)]
    pub connector_config: NormalizedConfig,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Content {
    #[validate(length(min = 1, max = 255))]
    pub connector_name: String,
    #[validate(length(min = 1, max = 255))]
    pub connector_description: String,
    #[validate(length(min = 1))]
    pub connector_type: String,
    #[schema(value_type = Object)]
    pub connector_config: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListParams {
    #[validate(length(min = 1))]
    pub connector_name: Option<String>,
    #[validate(length(min = 1))]
    pub connector_type: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: Pagination,
}

#[automock]
#[async_trait]
pub trait ConnectorStore {
    async fn create_connector(&self, content: &Connector) -> Result<()>;
    async fn get_connector(&self, id: &str) -> Result<Connector>;
    async fn list_connector(
        &self,
        opts: &ListParams,
    ) -> Result<List<Connector>>;
    async fn delete_connector(&self, id: &str) -> Result<()>;
}
