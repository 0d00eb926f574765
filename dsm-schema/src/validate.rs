use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{ConfigField, FieldType};

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("missing required field `{slug}`")]
    MissingField { slug: String },
    #[error("unexpected field `{slug}`")]
    UnexpectedField { slug: String },
    #[error("field `{slug}` expects {expected}, got {actual}")]
    TypeMismatch {
        slug: String,
        expected: FieldType,
        actual: String,
    },
}

/// Every violation found in one payload. Validation never stops at the
/// first failure, callers get the whole list in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Violations(pub Vec<Violation>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, violation) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// A payload reduced to exactly the declared slugs, in schema order,
/// with values coerced to their declared types. This is the form that
/// gets persisted.
#[derive(
    Debug, Clone, Default, PartialEq, Deserialize, Serialize,
)]
pub struct NormalizedConfig(pub Map<String, Value>);

pub fn validate(
    payload: &HashMap<String, Value>,
    schema: &[ConfigField],
    exhaustive: bool,
) -> Result<NormalizedConfig, Violations> {
    let mut violations = Vec::new();

    for field in schema {
        if field.required
            && payload.get(&field.slug).map_or(true, Value::is_null)
        {
            violations.push(Violation::MissingField {
                slug: field.slug.clone(),
            });
        }
    }

    if exhaustive {
        // 载荷是无序映射，排序保证报错顺序稳定
        let mut unknown = payload
            .keys()
            .filter(|key| !schema.iter().any(|field| field.slug.eq(*key)))
            .cloned()
            .collect::<Vec<_>>();
        unknown.sort();
        for slug in unknown {
            violations.push(Violation::UnexpectedField { slug });
        }
    }

    let mut normalized = Map::new();
    for field in schema {
        let value = match payload.get(&field.slug) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };
        match conform(value, field.field_type) {
            Ok(value) => {
                normalized.insert(field.slug.clone(), value);
            }
            Err((expected, actual)) => {
                violations.push(Violation::TypeMismatch {
                    slug: field.slug.clone(),
                    expected,
                    actual,
                });
            }
        }
    }

    if !violations.is_empty() {
        return Err(Violations(violations));
    }
    Ok(NormalizedConfig(normalized))
}

fn conform(
    value: &Value,
    field_type: Option<FieldType>,
) -> Result<Value, (FieldType, String)> {
    let expected = match field_type {
        Some(v) => v,
        None => return Ok(value.clone()),
    };
    coerce(value, expected)
        .ok_or_else(|| (expected, type_name(value).to_owned()))
}

fn coerce(value: &Value, expected: FieldType) -> Option<Value> {
    match expected {
        FieldType::Text => value.as_str().map(Value::from),
        FieldType::Integer => match value {
            Value::Number(number) if number.is_i64() || number.is_u64() => {
                Some(value.clone())
            }
            Value::String(raw) => raw.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        FieldType::Float => match value {
            Value::Number(_) => Some(value.clone()),
            Value::String(raw) => raw.trim().parse::<f64>().ok().map(Value::from),
            _ => None,
        },
        FieldType::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            Value::String(raw) => match raw.as_str() {
                "true" => Some(Value::from(true)),
                "false" => Some(Value::from(false)),
                _ => None,
            },
            _ => None,
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Value};

    use super::{validate, Violation, Violations};
    use crate::{ConfigField, FieldType};

    fn psql_schema() -> Vec<ConfigField> {
        [
            ("db_name", None),
            ("db_host", None),
            ("db_port", Some(FieldType::Integer)),
            ("db_user", None),
            ("db_password", None),
            ("db_sslmode", None),
        ]
        .into_iter()
        .map(|(slug, field_type)| ConfigField {
            slug: slug.to_owned(),
            field: slug.to_owned(),
            field_type,
            required: true,
        })
        .collect()
    }

    fn psql_payload() -> HashMap<String, Value> {
        HashMap::from([
            ("db_host".to_owned(), json!("localhost")),
            ("db_port".to_owned(), json!(5432)),
            ("db_name".to_owned(), json!("sampledb")),
            ("db_user".to_owned(), json!("postgres")),
            ("db_password".to_owned(), json!("root")),
            ("db_sslmode".to_owned(), json!("disable")),
        ])
    }

    #[test]
    fn test_validate_normalizes_in_schema_order() {
        let result = validate(&psql_payload(), &psql_schema(), false).unwrap();
        assert!(result
            .0
            .keys()
            .map(|key| key.as_str())
            .eq([
                "db_name",
                "db_host",
                "db_port",
                "db_user",
                "db_password",
                "db_sslmode",
            ]));
        assert_eq!(result.0["db_port"], json!(5432));
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let mut payload = psql_payload();
        payload.remove("db_user");
        payload.remove("db_password");
        let err = validate(&payload, &psql_schema(), false).unwrap_err();
        assert_eq!(
            err,
            Violations(vec![
                Violation::MissingField {
                    slug: "db_user".to_owned()
                },
                Violation::MissingField {
                    slug: "db_password".to_owned()
                },
            ])
        );
    }

    #[test]
    fn test_validate_missing_password_only() {
        let mut payload = psql_payload();
        payload.remove("db_password");
        let err = validate(&payload, &psql_schema(), false).unwrap_err();
        assert_eq!(
            err.0,
            vec![Violation::MissingField {
                slug: "db_password".to_owned()
            }]
        );
    }

    #[test]
    fn test_validate_exhaustive_rejects_unknown_fields() {
        let mut payload = psql_payload();
        payload.insert("db_timeout".to_owned(), json!(30));
        let err = validate(&payload, &psql_schema(), true).unwrap_err();
        assert_eq!(
            err.0,
            vec![Violation::UnexpectedField {
                slug: "db_timeout".to_owned()
            }]
        );
    }

    #[test]
    fn test_validate_non_exhaustive_tolerates_unknown_fields() {
        let mut payload = psql_payload();
        payload.insert("db_timeout".to_owned(), json!(30));
        let result = validate(&payload, &psql_schema(), false).unwrap();
        // 多余字段不进入规范化结果
        assert!(!result.0.contains_key("db_timeout"));
        assert_eq!(result.0.len(), 6);
    }

    #[test]
    fn test_validate_type_mismatch() {
        let mut payload = psql_payload();
        payload.insert("db_port".to_owned(), json!("not-a-port"));
        let err = validate(&payload, &psql_schema(), false).unwrap_err();
        assert_eq!(
            err.0,
            vec![Violation::TypeMismatch {
                slug: "db_port".to_owned(),
                expected: FieldType::Integer,
                actual: "string".to_owned(),
            }]
        );
    }

    #[test]
    fn test_validate_coerces_integral_strings() {
        let mut payload = psql_payload();
        payload.insert("db_port".to_owned(), json!("5432"));
        let result = validate(&payload, &psql_schema(), false).unwrap();
        assert_eq!(result.0["db_port"], json!(5432));
    }

    #[test]
    fn test_validate_coerces_boolean_strings() {
        let schema = vec![ConfigField {
            slug: "use_tls".to_owned(),
            field: "use_tls".to_owned(),
            field_type: Some(FieldType::Boolean),
            required: true,
        }];
        let payload =
            HashMap::from([("use_tls".to_owned(), json!("true"))]);
        let result = validate(&payload, &schema, true).unwrap();
        assert_eq!(result.0["use_tls"], json!(true));
    }

    #[test]
    fn test_validate_empty_schema_empty_payload() {
        let result = validate(&HashMap::new(), &[], true).unwrap();
        assert!(result.0.is_empty());
    }

    #[test]
    fn test_validate_optional_null_is_omitted() {
        let schema = vec![
            ConfigField {
                slug: "db_host".to_owned(),
                field: "db_host".to_owned(),
                field_type: None,
                required: true,
            },
            ConfigField {
                slug: "db_sslmode".to_owned(),
                field: "db_sslmode".to_owned(),
                field_type: None,
                required: false,
            },
        ];
        let payload = HashMap::from([
            ("db_host".to_owned(), json!("localhost")),
            ("db_sslmode".to_owned(), Value::Null),
        ]);
        let result = validate(&payload, &schema, true).unwrap();
        assert_eq!(result.0.len(), 1);
        assert!(!result.0.contains_key("db_sslmode"));
    }

    #[test]
    fn test_validate_required_null_is_missing() {
        let mut payload = psql_payload();
        payload.insert("db_password".to_owned(), Value::Null);
        let err = validate(&payload, &psql_schema(), false).unwrap_err();
        assert_eq!(
            err.0,
            vec![Violation::MissingField {
                slug: "db_password".to_owned()
            }]
        );
    }

    #[test]
    fn test_validate_aggregates_all_kinds() {
        let mut payload = psql_payload();
        payload.remove("db_user");
        payload.insert("db_port".to_owned(), json!(false));
        payload.insert("extra".to_owned(), json!("x"));
        let err = validate(&payload, &psql_schema(), true).unwrap_err();
        assert_eq!(
            err.0,
            vec![
                Violation::MissingField {
                    slug: "db_user".to_owned()
                },
                Violation::UnexpectedField {
                    slug: "extra".to_owned()
                },
                Violation::TypeMismatch {
                    slug: "db_port".to_owned(),
                    expected: FieldType::Integer,
                    actual: "boolean".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_validate_password_gets_no_special_casing() {
        let payload = psql_payload();
        let result = validate(&payload, &psql_schema(), false).unwrap();
        assert_eq!(result.0["db_password"], json!("root"));
    }
}
