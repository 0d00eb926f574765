use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use dsm_slo::{errors, Result};

use super::{Connector, ConnectorStore, ListParams};
use crate::{storage_err, List};

#[derive(Clone, Debug)]
pub struct ConnectorImpl {
    pool: MySqlPool,
}

impl ConnectorImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectorStore for ConnectorImpl {
    #[tracing::instrument]
    async fn create_connector(&self, content: &Connector) -> Result<()> {
        let id = content
            .id
            .parse::<u64>()
            .map_err(|err| errors::bad_request(&err))?;
        let provider_id = content
            .connector_type
            .parse::<u64>()
            .map_err(|err| errors::bad_request(&err))?;
        let config = serde_json::to_string(&content.connector_config)
            .map_err(errors::any)?;
        sqlx::query(
            r#"INSERT INTO `connector`
            (`id`,`connector_name`,`connector_description`,`connector_type`,`connector_config`)
            VALUES(?,?,?,?,?);"#,
        )
        .bind(id)
        .bind(&content.connector_name)
        .bind(&content.connector_description)
        .bind(provider_id)
        .bind(config)
        .execute(&self.pool)
        .await
        .map_err(|err| match err {
            // uniqueness is enforced by the key on (connector_name, deleted)
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                errors::conflict("connector name already exists")
            }
            err => storage_err(err),
        })?;
        Ok(())
    }

    #[tracing::instrument]
    async fn get_connector(&self, id: &str) -> Result<Connector> {
        let id = id.parse::<u64>().map_err(|err| errors::bad_request(&err))?;
        let row = match sqlx::query(
            r#"SELECT `id`,`connector_name`,`connector_description`,`connector_type`,`connector_config`,`created_at`,`updated_at`
            FROM `connector`
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
        Ok(Connector {
            id: row
                .try_get::<u64, _>("id")
                .map_err(errors::any)?
                .to_string(),
            connector_name: row
                .try_get("connector_name")
                .map_err(errors::any)?,
            connector_description: row
                .try_get("connector_description")
                .map_err(errors::any)?,
            connector_type: row
                .try_get::<u64, _>("connector_type")
                .map_err(errors::any)?
                .to_string(),
            connector_config: serde_json::from_str(
                &row.try_get::<String, _>("connector_config")
                    .map_err(errors::any)?,
            )
            .map_err(errors::any)?,
            created_at: row.try_get("created_at").map_err(errors::any)?,
            updated_at: row.try_get("updated_at").map_err(errors::any)?,
        })
    }

    #[tracing::instrument]
    async fn list_connector(
        &self,
        opts: &ListParams,
    ) -> Result<List<Connector>> {
        let mut provider_id = None;
        if let Some(v) = &opts.connector_type {
            provider_id = Some(
                v.parse::<u64>().map_err(|err| errors::bad_request(&err))?,
            );
        }
        let mut wheres = String::from("`deleted` = 0");
        if opts.connector_name.is_some() {
            wheres.push_str(" AND `connector_name` = ?");
        }
        if provider_id.is_some() {
            wheres.push_str(" AND `connector_type` = ?");
        }

        let mut output = List {
            limit: opts.pagination.limit(),
            offset: opts.pagination.offset(),
            ..Default::default()
        };
        let count_sql = format!(
            "SELECT COUNT(*) as count FROM `connector` WHERE {};",
            wheres
        );
        let mut count = sqlx::query(&count_sql);
        if let Some(v) = &opts.connector_name {
            count = count.bind(v);
        }
        if let Some(v) = provider_id {
            count = count.bind(v);
        }
        output.total = count
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?
            .try_get("count")
            .map_err(errors::any)?;

        let mut sql = format!(
            "SELECT `id`,`connector_name`,`connector_description`,`connector_type`,`connector_config`,`created_at`,`updated_at` FROM `connector` WHERE {}",
            wheres
        );
        opts.pagination.convert(&mut sql);
        sql.push(';');
        let mut query = sqlx::query(&sql);
        if let Some(v) = &opts.connector_name {
            query = query.bind(v);
        }
        if let Some(v) = provider_id {
            query = query.bind(v);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(storage_err)?;
        for row in rows.iter() {
            output.data.push(Connector {
                id: row
                    .try_get::<u64, _>("id")
                    .map_err(errors::any)?
                    .to_string(),
                connector_name: row
                    .try_get("connector_name")
                    .map_err(errors::any)?,
                connector_description: row
                    .try_get("connector_description")
                    .map_err(errors::any)?,
                connector_type: row
                    .try_get::<u64, _>("connector_type")
                    .map_err(errors::any)?
                    .to_string(),
                connector_config: serde_json::from_str(
                    &row.try_get::<String, _>("connector_config")
                        .map_err(errors::any)?,
                )
                .map_err(errors::any)?,
                created_at: row.try_get("created_at").map_err(errors::any)?,
                updated_at: row.try_get("updated_at").map_err(errors::any)?,
            });
        }
        Ok(output)
    }

    #[tracing::instrument]
    async fn delete_connector(&self, id: &str) -> Result<()> {
        let id = id.parse::<u64>().map_err(|err| errors::bad_request(&err))?;
        sqlx::query(
            r#"UPDATE `connector` SET `deleted` = `id`,`deleted_at` = now()
            WHERE `id` = ? AND `deleted` = 0;"#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}
