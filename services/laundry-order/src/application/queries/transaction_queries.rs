//! 交易查询

use laundry_common::{PageQuery, PagedResult, SortDirection};
use laundry_cqrs_core::Query;
use serde::Serialize;

use crate::domain::entities::{Transaction, TransactionAggregate, TransactionDetail};
use crate::domain::value_objects::{OutletId, TransactionId};

/// 单笔交易完整视图
#[derive(Debug, Clone, Copy)]
pub struct GetTransactionQuery {
    pub transaction_id: TransactionId,
}

impl Query for GetTransactionQuery {
    const NAME: &'static str = "get_transaction";
    type Result = TransactionAggregate;
}

#[derive(Debug, Clone, Copy)]
pub struct GetTransactionDetailsQuery {
    pub transaction_id: TransactionId,
}

impl Query for GetTransactionDetailsQuery {
    const NAME: &'static str = "get_transaction_details";
    type Result = Vec<TransactionDetail>;
}

#[derive(Debug, Clone, Copy)]
pub struct ListTransactionsByOutletQuery {
    pub outlet_id: OutletId,
}

impl Query for ListTransactionsByOutletQuery {
    const NAME: &'static str = "list_outlet_transactions";
    type Result = Vec<Transaction>;
}

/// DataTables 风格的列表查询
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTransactionsQuery {
    pub draw: i64,
    pub start: u32,
    pub length: u32,
    pub search: Option<String>,
    pub order_column: Option<String>,
    pub order_dir: Option<String>,
}

impl Query for ListTransactionsQuery {
    const NAME: &'static str = "list_transactions";
    type Result = DataTablesPage<Transaction>;
}

impl ListTransactionsQuery {
    pub fn to_page_query(&self) -> PageQuery {
        let mut query = PageQuery::new(self.length, self.start);
        if let Some(search) = &self.search {
            query = query.with_search(search.as_str());
        }
        if let Some(column) = &self.order_column {
            let dir = self
                .order_dir
                .as_deref()
                .map(SortDirection::parse_lenient)
                .unwrap_or_default();
            query = query.with_sort(column.clone(), dir);
        }
        query
    }
}

/// DataTables 响应
#[derive(Debug, Clone, Serialize)]
pub struct DataTablesPage<T> {
    pub draw: i64,
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    pub data: Vec<T>,
}

impl<T> DataTablesPage<T> {
    pub fn from_page(draw: i64, page: PagedResult<T>) -> Self {
        Self {
            draw,
            records_total: page.total,
            records_filtered: page.filtered,
            data: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_uses_whitelist() {
        let query = ListTransactionsQuery {
            draw: 3,
            start: 20,
            length: 10,
            search: Some(" INV2024 ".into()),
            order_column: Some("total_harga".into()),
            order_dir: Some("asc".into()),
        }
        .to_page_query();

        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, 10);
        assert_eq!(query.search.as_deref(), Some("INV2024"));
        assert_eq!(query.sort_field.as_deref(), Some("total_harga"));
        assert_eq!(query.sort_dir, SortDirection::Asc);
    }

    #[test]
    fn test_defaults_without_order() {
        let query = ListTransactionsQuery {
            length: 500,
            search: Some("   ".into()),
            ..Default::default()
        }
        .to_page_query();

        assert_eq!(query.limit, PageQuery::MAX_LIMIT);
        assert!(query.search.is_none());
        assert!(query.sort_field.is_none());
        assert_eq!(query.sort_dir, SortDirection::Desc);
    }

    #[test]
    fn test_serialized_field_names() {
        let page = DataTablesPage::from_page(1, PagedResult::new(vec![1, 2], 10, 2));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["recordsTotal"], 10);
        assert_eq!(json["recordsFiltered"], 2);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }
}
