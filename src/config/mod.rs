//! Configuration loading and merging with CLI flags.
mod loader;
mod settings;
pub mod types;


pub use loader::{DEFAULT_CONFIG_FILES, load_config, load_config_file};
pub use settings::{ResolvedSettings, resolve_settings};
