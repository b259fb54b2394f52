//! Sign-in commands.

use anyhow::Result;
use clap::Args;
use console::Style;

use super::{Context, fail, print_ok, print_session};

/// Arguments for `signin-email`.
#[derive(Args, Debug)]
pub struct SignInEmailArgs {
    /// Email address to send the code to
    pub email: String,
}

/// Arguments for `verify-email`.
#[derive(Args, Debug)]
pub struct VerifyEmailArgs {
    /// Email address the code was sent to
    pub email: String,

    /// One-time code from the email
    pub code: String,
}

/// Arguments for `signin-social`.
#[derive(Args, Debug)]
pub struct SignInSocialArgs {
    /// Identity provider: google, microsoft, apple, or any other name the service accepts
    pub provider: String,
}

/// Arguments for `verify-social`.
#[derive(Args, Debug)]
pub struct VerifySocialArgs {
    /// Identity provider: google, microsoft, apple, or any other name the service accepts
    pub provider: String,

    /// Authorization code returned by the provider redirect
    pub authorization_code: String,
}

pub fn run_email(args: SignInEmailArgs, ctx: &Context) -> Result<()> {
    ctx.auth
        .sign_in_email(&args.email)
        .map_err(|e| fail(e, ctx))?;
    print_ok(&format!("Sign-in code sent to {}", args.email), ctx);
    Ok(())
}

pub fn run_verify_email(args: VerifyEmailArgs, ctx: &Context) -> Result<()> {
    let record = ctx
        .auth
        .sign_in_email_verify(&args.email, &args.code)
        .map_err(|e| fail(e, ctx))?;
    print_session(&record, ctx)
}

pub fn run_social(args: SignInSocialArgs, ctx: &Context) -> Result<()> {
    let social = ctx
        .auth
        .sign_in_social(&args.provider)
        .map_err(|e| fail(e, ctx))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "error": "no_error",
            "signin_url": social.signin_url,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Open this URL to continue:");
        println!("  {}", Style::new().cyan().apply_to(&social.signin_url));
    }
    Ok(())
}

pub fn run_verify_social(args: VerifySocialArgs, ctx: &Context) -> Result<()> {
    let record = ctx
        .auth
        .sign_in_social_verify(&args.provider, &args.authorization_code)
        .map_err(|e| fail(e, ctx))?;
    print_session(&record, ctx)
}
