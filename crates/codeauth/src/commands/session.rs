//! Session commands.

use anyhow::Result;
use clap::{Args, ValueEnum};
use codeauth_client::InvalidateType;

use super::{Context, fail, print_ok, print_session};

/// Arguments for `info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Session token
    pub token: String,
}

/// Arguments for `refresh`.
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Session token to exchange
    pub token: String,
}

/// Invalidation scope accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum Mode {
    /// Only the given session
    #[default]
    OnlyThis,
    /// Every session of the user
    All,
    /// Every session of the user except the given one
    AllButThis,
}

impl From<Mode> for InvalidateType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::OnlyThis => InvalidateType::OnlyThis,
            Mode::All => InvalidateType::All,
            Mode::AllButThis => InvalidateType::AllButThis,
        }
    }
}

/// Arguments for `invalidate`.
#[derive(Args, Debug)]
pub struct InvalidateArgs {
    /// Session token
    pub token: String,

    /// Which sessions to invalidate
    #[arg(long, value_enum, default_value_t = Mode::OnlyThis)]
    pub mode: Mode,
}

pub fn run_info(args: InfoArgs, ctx: &Context) -> Result<()> {
    let record = ctx
        .auth
        .session_info(&args.token)
        .map_err(|e| fail(e, ctx))?;
    print_session(&record, ctx)
}

pub fn run_refresh(args: RefreshArgs, ctx: &Context) -> Result<()> {
    let record = ctx
        .auth
        .session_refresh(&args.token)
        .map_err(|e| fail(e, ctx))?;
    print_session(&record, ctx)
}

pub fn run_invalidate(args: InvalidateArgs, ctx: &Context) -> Result<()> {
    let mode = InvalidateType::from(args.mode);
    ctx.auth
        .session_invalidate(&args.token, mode)
        .map_err(|e| fail(e, ctx))?;
    print_ok(&format!("Invalidated ({})", mode), ctx);
    Ok(())
}
