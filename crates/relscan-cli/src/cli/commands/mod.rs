//! CLI command handlers. Each command is in its own file.

mod completions;
mod hash;
mod publish;
mod scan;

pub use completions::run_completions;
pub use hash::run_hash;
pub use publish::run_publish;
pub use scan::run_scan;
