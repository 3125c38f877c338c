mod transaction_queries;

pub use transaction_queries::*;
