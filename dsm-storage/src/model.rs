use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use dsm_slo::regexp::{check_number, check_order_by};

#[derive(Debug, Serialize, ToSchema, Default)]
pub struct List<T> {
    pub data: Vec<T>,
    pub limit: u64,
    pub offset: u64,
    pub total: i64,
}

// Query-string values all arrive as strings; keeping the fields as
// validated strings sidesteps flatten issues in urlencoded payloads.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct Pagination {
    #[validate(custom(function = "check_number"))]
    pub limit: Option<String>,
    #[validate(custom(function = "check_number"))]
    pub offset: Option<String>,
    #[validate(custom(function = "check_order_by"))]
    pub order_by: Option<String>,
}

impl Pagination {
    const DEFAULT_LIMIT: u64 = 20;
    const DEFAULT_ORDER_BY: &'static str = "`created_at` DESC";

    pub fn limit(&self) -> u64 {
        self.limit
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.offset
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn convert(&self, wheres: &mut String) {
        wheres.push_str(" ORDER BY ");
        match &self.order_by {
            Some(order_by) => wheres.push_str(order_by),
            None => wheres.push_str(Self::DEFAULT_ORDER_BY),
        }
        let limit = self.limit();
        if limit > 0 {
            wheres.push_str(" LIMIT ");
            wheres.push_str(limit.to_string().as_str());
        }
        let offset = self.offset();
        if offset > 0 {
            wheres.push_str(" OFFSET ");
            wheres.push_str(offset.to_string().as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::default();
        let mut wheres = String::from("`deleted` = 0");
        pagination.convert(&mut wheres);
        assert_eq!(
            wheres,
            "`deleted` = 0 ORDER BY `created_at` DESC LIMIT 20"
        );
    }

    #[test]
    fn test_pagination_convert() {
        let pagination = Pagination {
            limit: Some("5".to_owned()),
            offset: Some("10".to_owned()),
            order_by: Some("connector_name asc".to_owned()),
        };
        let mut wheres = String::from("`deleted` = 0");
        pagination.convert(&mut wheres);
        assert_eq!(
            wheres,
            "`deleted` = 0 ORDER BY connector_name asc LIMIT 5 OFFSET 10"
        );
    }
}
