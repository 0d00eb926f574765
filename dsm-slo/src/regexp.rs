use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref ORDER_BY: Regex = Regex::new(
        r"^`?[a-z][a-z0-9_]*`?(\s+(asc|desc|ASC|DESC))?(\s*,\s*`?[a-z][a-z0-9_]*`?(\s+(asc|desc|ASC|DESC))?)*$"
    )
    .unwrap();
    static ref NUMBER: Regex = Regex::new(r"^\d+$").unwrap();
}

pub fn check_order_by(val: &str) -> Result<(), ValidationError> {
    if ORDER_BY.is_match(val) {
        return Ok(());
    }
    Err(ValidationError::new("invalid order_by"))
}

pub fn check_number(val: &str) -> Result<(), ValidationError> {
    if NUMBER.is_match(val) {
        return Ok(());
    }
    Err(ValidationError::new("invalid number"))
}
