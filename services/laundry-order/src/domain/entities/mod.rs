mod catalog;
mod customer;
mod organization;
mod transaction;
mod user_account;

pub use catalog::*;
pub use customer::*;
pub use organization::*;
pub use transaction::*;
pub use user_account::*;
