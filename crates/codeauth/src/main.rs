//! CodeAuth - command-line client for the CodeAuth authentication service
//!
//! Main entry point for the CodeAuth CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{session, signin};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// CodeAuth - passwordless sign-in and session management
#[derive(Parser)]
#[command(name = "codeauth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Project endpoint, e.g. api.example.com (overrides config and CODEAUTH_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Project ID (overrides config and CODEAUTH_PROJECT_ID)
    #[arg(long, global = true)]
    pub project_id: Option<String>,

    /// Load this config file on top of the discovered ones
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Disable the session cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Session cache window in seconds
    #[arg(long, global = true)]
    pub cache_duration: Option<u64>,

    /// URL scheme used to reach the endpoint
    #[arg(long, global = true, default_value = "https")]
    pub scheme: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Email a one-time sign-in code
    SigninEmail(signin::SignInEmailArgs),

    /// Verify an emailed code and start a session
    VerifyEmail(signin::VerifyEmailArgs),

    /// Get a social OAuth2 sign-in URL
    SigninSocial(signin::SignInSocialArgs),

    /// Verify a social authorization code and start a session
    VerifySocial(signin::VerifySocialArgs),

    /// Show information about a session
    Info(session::InfoArgs),

    /// Exchange a session token for a new one
    Refresh(session::RefreshArgs),

    /// Invalidate sessions
    Invalidate(session::InvalidateArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays clean for output
    let filter = if cli.verbose {
        "codeauth=debug,codeauth_client=debug,codeauth_session=trace,codeauth_config=debug,info"
    } else {
        "codeauth=warn,codeauth_client=warn,codeauth_session=warn,codeauth_config=warn,error"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let ctx = commands::Context::from_cli(&cli)?;

    // Dispatch to command handlers
    match cli.command {
        Commands::SigninEmail(args) => signin::run_email(args, &ctx),
        Commands::VerifyEmail(args) => signin::run_verify_email(args, &ctx),
        Commands::SigninSocial(args) => signin::run_social(args, &ctx),
        Commands::VerifySocial(args) => signin::run_verify_social(args, &ctx),
        Commands::Info(args) => session::run_info(args, &ctx),
        Commands::Refresh(args) => session::run_refresh(args, &ctx),
        Commands::Invalidate(args) => session::run_invalidate(args, &ctx),
    }
}
