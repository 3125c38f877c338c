mod inquiry_commands;
mod lifecycle_commands;

pub use inquiry_commands::*;
pub use lifecycle_commands::*;
