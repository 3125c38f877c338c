//! laundry-bootstrap - 统一服务启动骨架
//!
//! 配置加载、日志初始化、基础设施创建（带重试）、HTTP 服务与优雅关闭

mod infrastructure;
mod retry;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
