mod payment_status;
mod reference_level;
mod transaction_status;

pub use payment_status::*;
pub use reference_level::*;
pub use transaction_status::*;

