mod actor;
mod ids;
mod invoice_number;

pub use actor::*;
pub use ids::*;
pub use invoice_number::*;
