use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::OrderHistoryEntity;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Raw `?page=&limit=` query. Values are parsed leniently by
/// [`PageRequest::from_query`].
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// 1-based page number, defaults to 1
    pub page: Option<String>,
    /// Page size, defaults to 10
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page > 0 { page } else { DEFAULT_PAGE },
            limit: if limit > 0 { limit } else { DEFAULT_PAGE_SIZE },
        }
    }

    /// Absent, non-numeric and non-positive values fall back to the defaults.
    pub fn from_query(query: &HistoryQuery) -> Self {
        let parse = |value: Option<&String>| {
            value
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };
        Self::new(parse(query.page.as_ref()), parse(query.limit.as_ref()))
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryPage {
    pub items: Vec<OrderHistoryEntity>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl OrderHistoryPage {
    pub fn new(items: Vec<OrderHistoryEntity>, request: PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items - 1) / request.limit + 1
        };

        Self {
            items,
            current_page: request.page,
            total_pages,
            total_items,
        }
    }
}
