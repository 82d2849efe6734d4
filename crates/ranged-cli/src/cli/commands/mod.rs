//! CLI command handlers. Each command is in its own file.

mod cat;
mod probe;

pub use cat::{run_cat, CatArgs};
pub use probe::run_probe;
