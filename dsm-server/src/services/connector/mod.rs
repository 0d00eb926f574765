use dsm_schema::ConfigField;
use dsm_slo::{errors, next_id, Result};
use dsm_storage::{
    connector::{Connector, ConnectorStore, Content},
    provider::ProviderStore,
};

/// Provision one connector: look the provider's declared schema up,
/// validate the raw payload against it, then persist the normalized
/// form. Every failure is typed so the host can map it to a distinct
/// response; nothing is written unless the single insert succeeds.
pub async fn create<P, C>(
    provider_store: &P,
    connector_store: &C,
    input: Content,
) -> Result<Connector>
where
    P: ProviderStore,
    C: ConnectorStore,
{
    let (config_types, exhaustive) = provider_store
        .get_config_types(&input.connector_type)
        .await?;
    let schema = config_types
        .into_iter()
        .map(ConfigField::from)
        .collect::<Vec<_>>();

    let connector_config =
        dsm_schema::validate(&input.connector_config, &schema, exhaustive)
            .map_err(errors::invalid_config)?;

    let id = next_id().map_err(errors::any)?;
    connector_store
        .create_connector(&Connector {
            id: id.to_string(),
            connector_name: input.connector_name,
            connector_description: input.connector_description,
            connector_type: input.connector_type,
            connector_config,
            ..Default::default()
        })
        .await?;
    connector_store.get_connector(&id.to_string()).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use dsm_schema::Violation;
    use dsm_slo::errors::{self, Code};
    use dsm_storage::{
        connector::{Connector, Content, MockConnectorStore},
        provider::{MockProviderStore, ProviderConfig},
    };

    use super::create;

    fn psql_config_types() -> Vec<ProviderConfig> {
        [
            "db_name",
            "db_host",
            "db_port",
            "db_user",
            "db_password",
            "db_sslmode",
        ]
        .iter()
        .enumerate()
        .map(|(idx, slug)| ProviderConfig {
            id: (idx + 1).to_string(),
            provider_id: "1".to_owned(),
            slug: (*slug).to_owned(),
            field: (*slug).to_owned(),
            field_type: None,
            required: true,
        })
        .collect()
    }

    fn psql_content() -> Content {
        Content {
            connector_name: "Test PSQL Connector".to_owned(),
            connector_description: "Connector for PSQL database".to_owned(),
            connector_type: "1".to_owned(),
            connector_config: HashMap::from([
                ("db_host".to_owned(), json!("localhost")),
                ("db_port".to_owned(), json!(5432)),
                ("db_name".to_owned(), json!("sampledb")),
                ("db_user".to_owned(), json!("postgres")),
                ("db_password".to_owned(), json!("root")),
                ("db_sslmode".to_owned(), json!("disable")),
            ]),
        }
    }

    #[tokio::test]
    async fn test_create_connector() {
        let mut provider_store = MockProviderStore::new();
        provider_store
            .expect_get_config_types()
            .returning(|_| Ok((psql_config_types(), false)));

        let mut connector_store = MockConnectorStore::new();
        connector_store
            .expect_create_connector()
            .times(1)
            .withf(|content| {
                content.connector_name == "Test PSQL Connector"
                    && content.connector_config.0.len() == 6
                    && content.connector_config.0.keys().map(|k| k.as_str()).eq([
                        "db_name",
                        "db_host",
                        "db_port",
                        "db_user",
                        "db_password",
                        "db_sslmode",
                    ])
            })
            .returning(|_| Ok(()));
        connector_store.expect_get_connector().returning(|id| {
            let mut content = psql_content();
            Ok(Connector {
                id: id.to_owned(),
                connector_name: content.connector_name,
                connector_description: content.connector_description,
                connector_type: content.connector_type,
                connector_config: dsm_schema::NormalizedConfig(
                    content
                        .connector_config
                        .drain()
                        .collect(),
                ),
                ..Default::default()
            })
        });

        let result = create(&provider_store, &connector_store, psql_content())
            .await
            .unwrap();
        assert_eq!(result.connector_name, "Test PSQL Connector");
        assert_eq!(result.connector_type, "1");
        assert_eq!(result.connector_config.0.len(), 6);
        assert!(!result.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_connector_unknown_provider() {
        let mut provider_store = MockProviderStore::new();
        provider_store
            .expect_get_config_types()
            .returning(|_| Err(errors::not_found("no rows")));

        let mut connector_store = MockConnectorStore::new();
        connector_store.expect_create_connector().never();

        let err = create(&provider_store, &connector_store, psql_content())
            .await
            .unwrap_err();
        assert_eq!(err, errors::not_found(""));
    }

    #[tokio::test]
    async fn test_create_connector_missing_password() {
        let mut provider_store = MockProviderStore::new();
        provider_store
            .expect_get_config_types()
            .returning(|_| Ok((psql_config_types(), false)));

        let mut connector_store = MockConnectorStore::new();
        connector_store.expect_create_connector().never();

        let mut input = psql_content();
        input.connector_config.remove("db_password");
        let err = create(&provider_store, &connector_store, input)
            .await
            .unwrap_err();
        match Code::from(err) {
            Code::InvalidConfig(violations) => {
                assert_eq!(
                    violations.0,
                    vec![Violation::MissingField {
                        slug: "db_password".to_owned()
                    }]
                );
            }
            code => panic!("unexpected error: {}", code),
        }
    }

    #[tokio::test]
    async fn test_create_connector_exhaustive_rejects_extras() {
        let mut provider_store = MockProviderStore::new();
        provider_store
            .expect_get_config_types()
            .returning(|_| Ok((psql_config_types(), true)));

        let mut connector_store = MockConnectorStore::new();
        connector_store.expect_create_connector().never();

        let mut input = psql_content();
        input
            .connector_config
            .insert("db_timeout".to_owned(), json!(30));
        let err = create(&provider_store, &connector_store, input)
            .await
            .unwrap_err();
        match Code::from(err) {
            Code::InvalidConfig(violations) => {
                assert_eq!(
                    violations.0,
                    vec![Violation::UnexpectedField {
                        slug: "db_timeout".to_owned()
                    }]
                );
            }
            code => panic!("unexpected error: {}", code),
        }
    }

    #[tokio::test]
    async fn test_create_connector_duplicate_name() {
        let mut provider_store = MockProviderStore::new();
        provider_store
            .expect_get_config_types()
            .returning(|_| Ok((psql_config_types(), false)));

        let mut connector_store = MockConnectorStore::new();
        connector_store
            .expect_create_connector()
            .times(1)
            .returning(|_| {
                Err(errors::conflict("connector name already exists"))
            });
        connector_store.expect_get_connector().never();

        let err = create(&provider_store, &connector_store, psql_content())
            .await
            .unwrap_err();
        assert_eq!(err, errors::conflict(""));
    }

    #[tokio::test]
    async fn test_create_connector_storage_unavailable() {
        let mut provider_store = MockProviderStore::new();
        provider_store
            .expect_get_config_types()
            .returning(|_| Ok((psql_config_types(), false)));

        let mut connector_store = MockConnectorStore::new();
        connector_store
            .expect_create_connector()
            .returning(|_| Err(errors::unavailable("pool timed out")));
        connector_store.expect_get_connector().never();

        let err = create(&provider_store, &connector_store, psql_content())
            .await
            .unwrap_err();
        assert_eq!(err, errors::unavailable(""));
    }
}
