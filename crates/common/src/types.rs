//! 通用类型定义

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[display("ASC")]
    Asc,
    #[default]
    #[display("DESC")]
    Desc,
}

impl SortDirection {
    /// 宽松解析，无法识别时回落到 `Desc`
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// 分页 / 搜索 / 排序参数
///
/// `sort_field` 是调用方给出的逻辑字段名，由各仓储按白名单映射为实际列名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_dir: SortDirection,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            search: None,
            sort_field: None,
            sort_dir: SortDirection::Desc,
        }
    }
}

impl PageQuery {
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_string())
        };
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, dir: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_dir = dir;
        self
    }

    /// `ILIKE` 匹配模式
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{}%", s))
    }

    /// 按白名单解析排序列，未命中时使用 `default_column`
    pub fn sort_column<'a>(&self, whitelist: &[(&str, &'a str)], default_column: &'a str) -> &'a str {
        self.sort_field
            .as_deref()
            .and_then(|field| {
                whitelist
                    .iter()
                    .find(|(name, _)| *name == field)
                    .map(|(_, column)| *column)
            })
            .unwrap_or(default_column)
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// 不带搜索条件的总数
    pub total: u64,
    /// 应用搜索条件后的总数
    pub filtered: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, filtered: u64) -> Self {
        Self {
            items,
            total,
            filtered,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            filtered: self.filtered,
        }
    }
}
