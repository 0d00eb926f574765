use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primitive type tag a provider may declare for one of its config fields.
/// Fields without a tag accept any JSON value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "boolean" => Ok(Self::Boolean),
            _ => Err(UnknownFieldType(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown field type `{0}`")]
pub struct UnknownFieldType(pub String);

/// One declared field of a provider's configuration schema.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ConfigField {
    pub slug: String,
    pub field: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    pub required: bool,
}

#[cfg(test)]
mod tests {
    use super::FieldType;

    #[test]
    fn test_field_type_round_trip() {
        for raw in ["text", "integer", "float", "boolean"] {
            let parsed = raw.parse::<FieldType>().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
        assert!("varchar".parse::<FieldType>().is_err());
    }
}
