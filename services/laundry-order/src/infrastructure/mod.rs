//! 基础设施层

pub mod migrations;
pub mod observability;
pub mod persistence;
