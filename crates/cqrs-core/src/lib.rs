//! laundry-cqrs-core - 命令 / 查询处理器 trait
//!
//! 应用层把每个用例建模为一个 [`Command`] 或 [`Query`]，由处理器实现对应的 handler trait；
//! HTTP 层通过 [`dispatch_command`] / [`dispatch_query`] 调用，统一记录结果。

mod command;
mod query;

pub use command::*;
pub use query::*;
