//! 分页 / 搜索 / 排序 SQL 拼装
//!
//! 排序列只来自白名单，搜索词始终作为绑定参数传入。

use laundry_adapter_postgres::map_sqlx_error;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::AppResult;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

/// 单表分页描述
pub struct PageSource {
    pub table: &'static str,
    pub columns: &'static str,
    /// 参与 `ILIKE` 搜索的列
    pub search_columns: &'static [&'static str],
    pub sort_columns: &'static [(&'static str, &'static str)],
    pub default_sort: &'static str,
}

impl PageSource {
    fn where_clause(&self, query: &PageQuery) -> String {
        if query.search.is_none() || self.search_columns.is_empty() {
            return String::new();
        }
        let conditions: Vec<String> = self
            .search_columns
            .iter()
            .map(|c| format!("{}::TEXT ILIKE $1", c))
            .collect();
        format!(" WHERE ({})", conditions.join(" OR "))
    }

    fn select_sql(&self, query: &PageQuery) -> String {
        let where_clause = self.where_clause(query);
        let first_param = if where_clause.is_empty() { 1 } else { 2 };
        format!(
            "SELECT {} FROM {}{} ORDER BY {} {} LIMIT ${} OFFSET ${}",
            self.columns,
            self.table,
            where_clause,
            query.sort_column(self.sort_columns, self.default_sort),
            query.sort_dir.as_sql(),
            first_param,
            first_param + 1
        )
    }
}

pub async fn fetch_page<R>(pool: &PgPool, source: &PageSource, query: &PageQuery) -> AppResult<PagedResult<R>>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let pattern = query.search_pattern();
    let where_clause = source.where_clause(query);

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", source.table))
        .fetch_one(pool)
        .await
        .map_err(|e| map_sqlx_error(e).context(format!("failed to count {}", source.table)))?;

    let filtered = if where_clause.is_empty() {
        total
    } else {
        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {}{}", source.table, where_clause))
                .bind(pattern.as_deref())
                .fetch_one(pool)
                .await
                .map_err(|e| map_sqlx_error(e).context(format!("failed to count {}", source.table)))?;
        count
    };

    let sql = source.select_sql(query);
    let mut q = sqlx::query_as::<_, R>(&sql);
    if !where_clause.is_empty() {
        q = q.bind(pattern.as_deref());
    }
    let items = q
        .bind(i64::from(query.limit))
        .bind(i64::from(query.offset))
        .fetch_all(pool)
        .await
        .map_err(|e| map_sqlx_error(e).context(format!("failed to list {}", source.table)))?;

    Ok(PagedResult::new(items, total.max(0) as u64, filtered.max(0) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use laundry_common::SortDirection;

    const CUSTOMERS: PageSource = PageSource {
        table: "pelanggan",
        columns: "id_pelanggan, nama_lengkap",
        search_columns: &["nama_lengkap", "telepon"],
        sort_columns: &[("nama", "nama_lengkap")],
        default_sort: "id_pelanggan",
    };

    #[test]
    fn test_select_without_search() {
        let sql = CUSTOMERS.select_sql(&PageQuery::new(10, 0));
        assert_eq!(
            sql,
            "SELECT id_pelanggan, nama_lengkap FROM pelanggan ORDER BY id_pelanggan DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_select_with_search_and_sort() {
        let query = PageQuery::new(5, 10)
            .with_search("budi")
            .with_sort("nama", SortDirection::Asc);
        let sql = CUSTOMERS.select_sql(&query);
        assert!(sql.contains("WHERE (nama_lengkap::TEXT ILIKE $1 OR telepon::TEXT ILIKE $1)"));
        assert!(sql.ends_with("ORDER BY nama_lengkap ASC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_unknown_sort_field_uses_default() {
        let query = PageQuery::new(5, 0).with_sort("id; DELETE FROM pelanggan", SortDirection::Asc);
        assert!(CUSTOMERS.select_sql(&query).contains("ORDER BY id_pelanggan ASC"));
    }
}
