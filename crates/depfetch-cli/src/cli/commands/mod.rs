//! CLI command handlers. Each command is in its own file.

mod completions;
mod crawl;
mod extract;
mod fetch;

pub use completions::{run_completions, run_man};
pub use crawl::run_crawl;
pub use extract::run_extract;
pub use fetch::run_fetch;

use std::path::Path;

use depfetch_core::ConfigError;

/// The input document must exist before anything else happens.
fn require_input(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingInput);
    }
    if !path.is_file() {
        return Err(ConfigError::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}
