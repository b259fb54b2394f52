//! Request and response types for the CodeAuth API.
//!
//! These types mirror the service's wire contract.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A flat JSON object, the shape of every request and response body.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

// ─────────────────────────────────────────────────────────────────────────────
// Error codes
// ─────────────────────────────────────────────────────────────────────────────

/// Value of the `error` field in a response body.
///
/// Unrecognized codes are kept verbatim in [`ErrorCode::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// The request succeeded.
    NoError,
    /// The request body was not valid JSON.
    BadJson,
    /// The project ID does not exist.
    ProjectNotFound,
    /// The caller's IP address was rejected.
    BadIpAddress,
    /// Too many requests.
    RateLimitReached,
    /// The email address was rejected.
    BadEmail,
    /// The one-time code did not match or has expired.
    BadCode,
    /// Unsupported social provider.
    BadSocialType,
    /// The social authorization code was rejected.
    BadAuthorizationCode,
    /// The session token is unknown or expired.
    BadSessionToken,
    /// The session has no refreshes left.
    OutOfRefresh,
    /// Unsupported invalidation mode.
    BadInvalidateType,
    /// The service failed internally.
    InternalError,
    /// The request never produced a usable response.
    ConnectionError,
    /// Any other code reported by the service.
    Unknown(String),
}

impl ErrorCode {
    /// Wire representation of this code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoError => "no_error",
            Self::BadJson => "bad_json",
            Self::ProjectNotFound => "project_not_found",
            Self::BadIpAddress => "bad_ip_address",
            Self::RateLimitReached => "rate_limit_reached",
            Self::BadEmail => "bad_email",
            Self::BadCode => "bad_code",
            Self::BadSocialType => "bad_social_type",
            Self::BadAuthorizationCode => "bad_authorization_code",
            Self::BadSessionToken => "bad_session_token",
            Self::OutOfRefresh => "out_of_refresh",
            Self::BadInvalidateType => "bad_invalidate_type",
            Self::InternalError => "internal_error",
            Self::ConnectionError => "connection_error",
            Self::Unknown(code) => code,
        }
    }

    /// Check if this code marks a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::NoError)
    }

    /// Check if the service asked the caller to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitReached)
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "no_error" => Self::NoError,
            "bad_json" => Self::BadJson,
            "project_not_found" => Self::ProjectNotFound,
            "bad_ip_address" => Self::BadIpAddress,
            "rate_limit_reached" => Self::RateLimitReached,
            "bad_email" => Self::BadEmail,
            "bad_code" => Self::BadCode,
            "bad_social_type" => Self::BadSocialType,
            "bad_authorization_code" => Self::BadAuthorizationCode,
            "bad_session_token" => Self::BadSessionToken,
            "out_of_refresh" => Self::OutOfRefresh,
            "bad_invalidate_type" => Self::BadInvalidateType,
            "internal_error" => Self::InternalError,
            "connection_error" => Self::ConnectionError,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Unknown(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// A session known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session token.
    pub session_token: String,
    /// Email of the signed-in user.
    pub email: String,
    /// Expiration as seconds since the Unix epoch.
    #[serde(deserialize_with = "integral")]
    pub expiration: i64,
    /// Remaining refresh operations.
    #[serde(deserialize_with = "integral")]
    pub refresh_left: u32,
}

impl SessionRecord {
    /// Expiration as a UTC timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expiration, 0)
    }

    /// Check if the session has passed its expiration.
    pub fn is_expired(&self) -> bool {
        self.expiration <= Utc::now().timestamp()
    }

    /// Check if the session may still be refreshed.
    pub fn can_refresh(&self) -> bool {
        self.refresh_left > 0
    }
}

/// Session info body; `/session/info` does not echo the token back.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SessionInfoResponse {
    #[serde(default)]
    pub session_token: Option<String>,
    pub email: String,
    #[serde(deserialize_with = "integral")]
    pub expiration: i64,
    #[serde(deserialize_with = "integral")]
    pub refresh_left: u32,
}

impl SessionInfoResponse {
    pub(crate) fn into_record(self, token: &str) -> SessionRecord {
        SessionRecord {
            session_token: self.session_token.unwrap_or_else(|| token.to_string()),
            email: self.email,
            expiration: self.expiration,
            refresh_left: self.refresh_left,
        }
    }
}

/// A JSON number as the service may send it.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Int(i64),
    Float(f64),
}

/// Deserialize an integer that may arrive as an integral float (`5.0`).
fn integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    use serde::de::Error;

    let value = match WireNumber::deserialize(deserializer)? {
        WireNumber::Int(n) => n,
        WireNumber::Float(f)
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            f as i64
        }
        WireNumber::Float(f) => {
            return Err(D::Error::custom(format!("expected an integer, got {}", f)));
        }
    };

    T::try_from(value).map_err(|_| D::Error::custom(format!("integer {} out of range", value)))
}

/// Result of starting a social sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSignIn {
    /// OAuth2 authorization URL to send the user to.
    pub signin_url: String,
}

/// Empty success body.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Empty {}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `/signin/email`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignInEmailRequest<'a> {
    pub project_id: &'a str,
    pub email: &'a str,
}

/// Body of `/signin/emailverify`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignInEmailVerifyRequest<'a> {
    pub project_id: &'a str,
    pub email: &'a str,
    pub code: &'a str,
}

/// Body of `/signin/social`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignInSocialRequest<'a> {
    pub project_id: &'a str,
    pub social_type: &'a str,
}

/// Body of `/signin/socialverify`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignInSocialVerifyRequest<'a> {
    pub project_id: &'a str,
    pub social_type: &'a str,
    pub authorization_code: &'a str,
}

/// Body of `/session/info` and `/session/refresh`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionTokenRequest<'a> {
    pub project_id: &'a str,
    pub session_token: &'a str,
}

/// Body of `/session/invalidate`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionInvalidateRequest<'a> {
    pub project_id: &'a str,
    pub session_token: &'a str,
    pub invalidate_type: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Social providers supported by the service.
///
/// Operations take `impl AsRef<str>`, so other provider names pass through
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialType {
    Google,
    Microsoft,
    Apple,
}

impl SocialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
            Self::Apple => "apple",
        }
    }
}

impl AsRef<str> for SocialType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SocialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which sessions an invalidation applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidateType {
    /// Only the given session.
    #[default]
    OnlyThis,
    /// Every session of the user.
    All,
    /// Every session of the user except the given one.
    AllButThis,
}

impl InvalidateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnlyThis => "only_this",
            Self::All => "all",
            Self::AllButThis => "all_but_this",
        }
    }
}

impl AsRef<str> for InvalidateType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InvalidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
