mod master_data;
mod transaction_repository;

pub use master_data::*;
pub use transaction_repository::*;
