mod field;
mod validate;

pub use field::{ConfigField, FieldType, UnknownFieldType};
pub use validate::{validate, NormalizedConfig, Violation, Violations};
