//! API endpoint implementations.
//!
//! Each module adds its operations to [`CodeAuth`](crate::CodeAuth).

mod session;
mod signin;

/// `/signin/email`
pub const SIGNIN_EMAIL: &str = "/signin/email";
/// `/signin/emailverify`
pub const SIGNIN_EMAIL_VERIFY: &str = "/signin/emailverify";
/// `/signin/social`
pub const SIGNIN_SOCIAL: &str = "/signin/social";
/// `/signin/socialverify`
pub const SIGNIN_SOCIAL_VERIFY: &str = "/signin/socialverify";
/// `/session/info`
pub const SESSION_INFO: &str = "/session/info";
/// `/session/refresh`
pub const SESSION_REFRESH: &str = "/session/refresh";
/// `/session/invalidate`
pub const SESSION_INVALIDATE: &str = "/session/invalidate";
