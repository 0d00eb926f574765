use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use dsm_slo::{errors, Result};

use super::{ListParams, Provider, ProviderConfig, ProviderStore};
use crate::{storage_err, List};

#[derive(Clone, Debug)]
pub struct ProviderImpl {
    pool: MySqlPool,
}

impl ProviderImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderStore for ProviderImpl {
    #[tracing::instrument]
    async fn get_provider(&self, id: &str) -> Result<Provider> {
        let id = id.parse::<u64>().map_err(|err| errors::bad_request(&err))?;
        let row = match sqlx::query(
            r#"SELECT `id`,`name`,`type`,`desc`,`exhaustive`,`created_at`,`updated_at`
            FROM `provider`
            WHERE `id` = ? AND `deleted` = 0;"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(v) => match v {
                Some(value) => Ok(value),
                None => Err(errors::not_found("no rows")),
            },
            Err(err) => Err(storage_err(err)),
        }?;
        Ok(Provider {
            id: row
                .try_get::<u64, _>("id")
                .map_err(errors::any)?
                .to_string(),
            name: row.try_get("name").map_err(errors::any)?,
            provider_type: row.try_get("type").map_err(errors::any)?,
            desc: row.try_get("desc").map_err(errors::any)?,
            exhaustive: row.try_get("exhaustive").map_err(errors::any)?,
            created_at: row.try_get("created_at").map_err(errors::any)?,
            updated_at: row.try_get("updated_at").map_err(errors::any)?,
        })
    }

    #[tracing::instrument]
    async fn get_config_types(
        &self,
        provider_id: &str,
    ) -> Result<(Vec<ProviderConfig>, bool)> {
        let id = provider_id
            .parse::<u64>()
            .map_err(|err| errors::bad_request(&err))?;
        let exhaustive = match sqlx::query(
            r#"SELECT `exhaustive` FROM `provider`
            WHERE `id` = ? AND `deleted` = 0;"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(v) => match v {
                Some(value) => {
                    value.try_get::<bool, _>("exhaustive").map_err(errors::any)
                }
                None => Err(errors::not_found("no rows")),
            },
            Err(err) => Err(storage_err(err)),
        }?;

        let rows = sqlx::query(
            r#"SELECT `id`,`provider_id`,`slug`,`field`,`type`,`required`
            FROM `provider_config`
            WHERE `provider_id` = ?
            ORDER BY `position`;"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        let mut data = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            data.push(ProviderConfig {
                id: row
                    .try_get::<u64, _>("id")
                    .map_err(errors::any)?
                    .to_string(),
                provider_id: row
                    .try_get::<u64, _>("provider_id")
                    .map_err(errors::any)?
                    .to_string(),
                slug: row.try_get("slug").map_err(errors::any)?,
                field: row.try_get("field").map_err(errors::any)?,
                field_type: row
                    .try_get::<Option<String>, _>("type")
                    .map_err(errors::any)?
                    .map(|v| v.parse().map_err(errors::any))
                    .transpose()?,
                required: row.try_get("required").map_err(errors::any)?,
            });
        }
        Ok((data, exhaustive))
    }

    #[tracing::instrument]
    async fn list_provider(
        &self,
        opts: &ListParams,
    ) -> Result<List<Provider>> {
        let mut wheres = String::from("`deleted` = 0");
        if opts.provider_type.is_some() {
            wheres.push_str(" AND `type` = ?");
        }

        let mut output = List {
            limit: opts.pagination.limit(),
            offset: opts.pagination.offset(),
            ..Default::default()
        };
        let count_sql = format!(
            "SELECT COUNT(*) as count FROM `provider` WHERE {};",
            wheres
        );
        let mut count = sqlx::query(&count_sql);
        if let Some(v) = &opts.provider_type {
            count = count.bind(v);
        }
        output.total = count
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?
            .try_get("count")
            .map_err(errors::any)?;

        let mut sql = format!(
            "SELECT `id`,`name`,`type`,`desc`,`exhaustive`,`created_at`,`updated_at` FROM `provider` WHERE {}",
            wheres
        );
        opts.pagination.convert(&mut sql);
        sql.push(';');
        let mut query = sqlx::query(&sql);
        if let Some(v) = &opts.provider_type {
            query = query.bind(v);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(storage_err)?;
        for row in rows.iter() {
            output.data.push(Provider {
                id: row
                    .try_get::<u64, _>("id")
                    .map_err(errors::any)?
                    .to_string(),
                name: row.try_get("name").map_err(errors::any)?,
                provider_type: row.try_get("type").map_err(errors::any)?,
                desc: row.try_get("desc").map_err(errors::any)?,
                exhaustive: row.try_get("exhaustive").map_err(errors::any)?,
                created_at: row.try_get("created_at").map_err(errors::any)?,
                updated_at: row.try_get("updated_at").map_err(errors::any)?,
            });
        }
        Ok(output)
    }
}
