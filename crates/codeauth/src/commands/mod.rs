//! CLI command handlers.

pub mod session;
pub mod signin;

use anyhow::Result;
use codeauth_client::{CodeAuth, HttpTransportConfig, SdkConfig, SessionRecord};
use codeauth_config::{CacheSection, CodeAuthConfig};
use console::Style;
use serde::Serialize;

use crate::Cli;

/// Shared context for all commands.
pub struct Context {
    /// Initialized client.
    pub auth: CodeAuth,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Resolve configuration from files, environment and flags, then build
    /// and initialize the client.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let loaded =
            codeauth_config::load_config_with_options(None, None, cli.config.as_deref())?;
        let mut config = loaded.config.clone();
        config.apply_env()?;
        config.merge(CodeAuthConfig {
            endpoint: cli.endpoint.clone(),
            project_id: cli.project_id.clone(),
            cache: CacheSection {
                enabled: cli.no_cache.then_some(false),
                duration_secs: cli.cache_duration,
            },
        });

        let resolved = config.resolve()?;
        tracing::debug!(loaded_from = ?loaded.loaded_from(), "Resolved configuration");

        let mut sdk = SdkConfig::new(resolved.endpoint, resolved.project_id)
            .with_cache(resolved.cache_duration);
        if !resolved.cache_enabled {
            sdk = sdk.without_cache();
        }

        let auth = CodeAuth::with_http_config(HttpTransportConfig::new().with_scheme(&cli.scheme))?;
        auth.initialize(sdk)?;

        Ok(Self {
            auth,
            json_output: cli.json,
            verbose: cli.verbose,
        })
    }
}

/// Turn a client error into a CLI failure, echoing the wire code.
pub fn fail(err: codeauth_client::Error, ctx: &Context) -> anyhow::Error {
    match err.code() {
        Some(code) => {
            if ctx.json_output {
                println!("{}", serde_json::json!({ "error": code.as_str() }));
            }
            if ctx.verbose {
                anyhow::anyhow!("{} ({})", code, err)
            } else {
                anyhow::anyhow!("{}", code)
            }
        }
        None => err.into(),
    }
}

/// JSON output for a session.
#[derive(Debug, Serialize)]
struct SessionOutput<'a> {
    error: &'static str,
    #[serde(flatten)]
    record: &'a SessionRecord,
}

/// Print a session record.
pub fn print_session(record: &SessionRecord, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        let output = SessionOutput {
            error: "no_error",
            record,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    let expires = record
        .expires_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| record.expiration.to_string());

    println!("  {} {}", dim.apply_to("Token:       "), record.session_token);
    println!("  {} {}", dim.apply_to("Email:       "), record.email);
    println!("  {} {}", dim.apply_to("Expires:     "), expires);
    println!("  {} {}", dim.apply_to("Refresh left:"), record.refresh_left);
    Ok(())
}

/// Print a bare success.
pub fn print_ok(message: &str, ctx: &Context) {
    if ctx.json_output {
        println!("{}", serde_json::json!({ "error": "no_error" }));
    } else {
        println!("{} {}", Style::new().green().apply_to("✓"), message);
    }
}
