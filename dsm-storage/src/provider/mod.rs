pub mod mariadb;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockall::automock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use dsm_schema::{ConfigField, FieldType};
use dsm_slo::Result;

use crate::{List, Pagination};

#[derive(
    Debug, Default, Deserialize, Serialize, ToSchema, PartialEq, Clone,
)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub desc: String,
    pub exhaustive: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One declared field of a provider's config schema. Rows are written
/// when the provider is registered and never touched afterwards.
#[derive(
    Debug, Default, Deserialize, Serialize, ToSchema, PartialEq, Clone,
)]
pub struct ProviderConfig {
    pub id: String,
    pub provider_id: String,
    pub slug: String,
    pub field: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    pub required: bool,
}

impl From<ProviderConfig> for ConfigField {
    fn from(value: ProviderConfig) -> Self {
        Self {
            slug: value.slug,
            field: value.field,
            field_type: value.field_type,
            required: value.required,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigTypes {
    pub data: Vec<ProviderConfig>,
    pub exhaustive: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListParams {
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub provider_type: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: Pagination,
}

#[automock]
#[async_trait]
pub trait ProviderStore {
    async fn get_provider(&self, id: &str) -> Result<Provider>;
    /// The catalog lookup: every declared field in schema order, plus
    /// whether unknown payload keys must be rejected.
    async fn get_config_types(
        &self,
        provider_id: &str,
    ) -> Result<(Vec<ProviderConfig>, bool)>;
    async fn list_provider(&self, opts: &ListParams)
        -> Result<List<Provider>>;
}
