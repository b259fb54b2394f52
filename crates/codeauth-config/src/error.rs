//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Missing required field.
    #[error("missing required setting '{field}' (set it in codeauth.toml, via {env_var}, or on the command line)")]
    MissingField { field: String, env_var: String },

    /// A value could not be interpreted.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },
}
