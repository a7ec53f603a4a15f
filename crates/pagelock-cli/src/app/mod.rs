//! Application-level utilities for the Pagelock CLI.
//!
//! This module provides:
//! - Path resolution for the config file and page documents
//! - Key store selection
//! - Unlocking with cache, environment and prompt fallbacks

mod resolver;
mod store;
mod unlock;

// Re-export public API
pub use resolver::{load_config, read_page, resolve_config_path};
pub use store::PageStore;
pub use unlock::{open_page, unlock_with_retry};
