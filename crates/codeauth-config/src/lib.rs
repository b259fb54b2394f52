//! Configuration loading for the CodeAuth client.
//!
//! Provides TOML-based configuration with:
//! - Config file layering (user config dir + project-local `codeauth.toml`)
//! - Environment variable overrides (`CODEAUTH_*`)
//! - Resolution into the settings needed to initialize a client

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    load_config, load_config_file, load_config_with_options, user_config_dir, user_config_path,
    ConfigSource, LoadedConfig,
};
pub use error::{ConfigError, Result};
pub use types::{CacheSection, CodeAuthConfig, ResolvedConfig};
