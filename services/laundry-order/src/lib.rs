//! laundry-order - 订单受理与生命周期服务

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod wiring;
