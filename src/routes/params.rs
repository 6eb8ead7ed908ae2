use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, models::OrderStatus, repository::orders::MAX_OFFSET};

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct LimitOffset {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl LimitOffset {
    pub fn normalize(&self) -> (u64, u64) {
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        let offset = self.offset.unwrap_or(0).min(MAX_OFFSET);
        (limit, offset)
    }
}

// Query strings are flat: `serde(flatten)` would hand numbers to the
// deserializer as strings, so pagination fields are repeated per query.

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserOrdersQuery {
    pub user_id: Uuid,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl UserOrdersQuery {
    pub fn pagination(&self) -> LimitOffset {
        LimitOffset {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusOrdersQuery {
    /// Comma separated statuses, e.g. `paid,ready`.
    #[serde(default)]
    pub statuses: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl StatusOrdersQuery {
    pub fn pagination(&self) -> LimitOffset {
        LimitOffset {
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn parse_statuses(&self) -> Result<Vec<OrderStatus>, AppError> {
        self.statuses
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<OrderStatus>().map_err(AppError::BadRequest))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_and_defaulted() {
        assert_eq!(LimitOffset::default().normalize(), (20, 0));
        let page = LimitOffset {
            limit: Some(1000),
            offset: Some(40),
        };
        assert_eq!(page.normalize(), (100, 40));
        let zero = LimitOffset {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(zero.normalize(), (1, 0));
    }

    #[test]
    fn offset_is_capped_to_what_the_store_can_bind() {
        let query = UserOrdersQuery {
            user_id: Uuid::new_v4(),
            limit: None,
            offset: Some(u64::MAX),
        };
        assert_eq!(query.pagination().normalize(), (20, i64::MAX as u64));
    }

    #[test]
    fn statuses_are_split_on_commas() {
        let query = StatusOrdersQuery {
            statuses: "paid, ready,,".into(),
            ..Default::default()
        };
        assert_eq!(
            query.parse_statuses().expect("valid"),
            vec![OrderStatus::Paid, OrderStatus::Ready]
        );

        assert!(StatusOrdersQuery::default().parse_statuses().expect("valid").is_empty());

        let bad = StatusOrdersQuery {
            statuses: "paid,shipped".into(),
            ..Default::default()
        };
        assert!(bad.parse_statuses().is_err());
    }
}
