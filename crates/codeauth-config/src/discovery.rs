//! Locating and layering `codeauth.toml` files.
//!
//! Files are read lowest priority first and each one overrides what came
//! before it:
//! 1. the user file, `<config dir>/codeauth/config.toml`
//! 2. `codeauth.toml` in the project directory
//! 3. a file named with `--config`, if any
//!
//! `CODEAUTH_*` variables and command-line flags sit above all files and are
//! applied by the caller.

use std::path::{Path, PathBuf};

use crate::{CodeAuthConfig, ConfigError, Result};

const PROJECT_FILE: &str = "codeauth.toml";
const USER_FILE: &str = "config.toml";
const APP_DIR: &str = "codeauth";

/// Points the user layer at another directory (handy for tests and CI).
const CONFIG_DIR_ENV: &str = "CODEAUTH_CONFIG_DIR";

/// One file that discovery looked at.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// `false` when the file was absent or could not be parsed.
    pub loaded: bool,
}

/// Outcome of [`load_config`]: the merged file layers and how they were found.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// File layers merged together. Environment overrides are not applied.
    pub config: CodeAuthConfig,
    /// Every file considered, user file first.
    pub sources: Vec<ConfigSource>,
    /// One message per discovered file that was skipped because it was broken.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the files that contributed settings.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter_map(|s| s.loaded.then_some(s.path.as_path()))
            .collect()
    }
}

/// Merge the user file and `codeauth.toml` from `project_dir` (or the
/// working directory).
///
/// Follow up with [`CodeAuthConfig::apply_env`] to pick up `CODEAUTH_*`.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None, None)
}

/// Like [`load_config`], with the user directory and an extra file supplied
/// by the caller.
///
/// A broken discovered file only produces a warning. A broken or missing
/// `explicit_file` is an error, since the user asked for it by name.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
    explicit_file: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut loaded = LoadedConfig {
        config: CodeAuthConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };

    let user_file = match config_dir {
        Some(dir) => Some(dir.join(USER_FILE)),
        None => user_config_path(),
    };
    if let Some(path) = user_file {
        load_layer(&mut loaded, path);
    }

    let project_file = match project_dir {
        Some(dir) => dir.join(PROJECT_FILE),
        None => PathBuf::from(PROJECT_FILE),
    };
    load_layer(&mut loaded, project_file);

    if let Some(path) = explicit_file {
        loaded.config.merge(load_config_file(path)?);
        loaded.sources.push(ConfigSource {
            path: path.to_path_buf(),
            loaded: true,
        });
    }

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    Ok(loaded)
}

/// Read and parse one file.
pub fn load_config_file(path: &Path) -> Result<CodeAuthConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    CodeAuthConfig::from_toml(&contents)
}

/// `<user config dir>/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(USER_FILE))
}

/// `$CODEAUTH_CONFIG_DIR` when set and non-empty, else `codeauth/` under the
/// platform config directory.
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|dir| dir.join(APP_DIR)),
    }
}

/// Merge a discovered file if it exists; record the attempt either way.
fn load_layer(loaded: &mut LoadedConfig, path: PathBuf) {
    let mut ok = false;
    if path.is_file() {
        match load_config_file(&path) {
            Ok(layer) => {
                loaded.config.merge(layer);
                tracing::debug!(path = %path.display(), "merged config file");
                ok = true;
            }
            Err(e) => loaded
                .warnings
                .push(format!("Failed to load {}: {}", path.display(), e)),
        }
    }

    loaded.sources.push(ConfigSource { path, loaded: ok });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codeauth.toml");
        fs::write(
            &path,
            r#"
endpoint = "api.example.com"
project_id = "proj1"
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.project_id.as_deref(), Some("proj1"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/codeauth.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_project_overrides_user() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();

        fs::write(
            user_dir.path().join("config.toml"),
            r#"
endpoint = "user.example.com"
project_id = "user-proj"
[cache]
duration_secs = 60
"#,
        )
        .unwrap();
        fs::write(
            project_dir.path().join("codeauth.toml"),
            r#"
project_id = "project-proj"
"#,
        )
        .unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path()), None)
                .unwrap();

        assert_eq!(loaded.config.endpoint.as_deref(), Some("user.example.com"));
        assert_eq!(loaded.config.project_id.as_deref(), Some("project-proj"));
        assert_eq!(loaded.config.cache.duration_secs, Some(60));
        assert_eq!(loaded.loaded_from().len(), 2);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_explicit_file_wins() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let explicit = project_dir.path().join("staging.toml");

        fs::write(
            project_dir.path().join("codeauth.toml"),
            "endpoint = \"prod.example.com\"\n",
        )
        .unwrap();
        fs::write(&explicit, "endpoint = \"staging.example.com\"\n").unwrap();

        let loaded = load_config_with_options(
            Some(project_dir.path()),
            Some(user_dir.path()),
            Some(&explicit),
        )
        .unwrap();

        assert_eq!(loaded.config.endpoint.as_deref(), Some("staging.example.com"));
        assert!(loaded.loaded_from().iter().any(|p| p.ends_with("staging.toml")));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");

        let result = load_config_with_options(Some(dir.path()), Some(dir.path()), Some(&missing));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_malformed_config_warns_but_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("codeauth.toml"), "not valid toml {{{{").unwrap();

        let loaded = load_config_with_options(Some(dir.path()), Some(dir.path()), None).unwrap();

        assert!(!loaded.warnings.is_empty());
        assert!(loaded.warnings[0].contains("Failed to load"));
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.config, CodeAuthConfig::new());
    }

    #[test]
    fn test_missing_files_are_not_errors() {
        let dir = TempDir::new().unwrap();

        let loaded = load_config_with_options(Some(dir.path()), Some(dir.path()), None).unwrap();

        assert_eq!(loaded.sources.len(), 2);
        assert!(loaded.loaded_from().is_empty());
        assert!(loaded.warnings.is_empty());
    }
}
