//! Blocking client SDK for the CodeAuth authentication service.
//!
//! This crate provides a typed client for the service's HTTP API with a
//! short-lived session cache in front of session lookups.
//!
//! # Example
//!
//! ```no_run
//! use codeauth_client::{CodeAuth, InvalidateType, Result, SdkConfig};
//!
//! # fn example() -> Result<()> {
//! // Create and configure a client
//! let auth = CodeAuth::new()?;
//! auth.initialize(SdkConfig::new("api.example.com", "proj1").with_cache_secs(30))?;
//!
//! // Email one-time-code sign-in
//! auth.sign_in_email("a@b.com")?;
//! let session = auth.sign_in_email_verify("a@b.com", "123456")?;
//!
//! // Served from cache within the window
//! let info = auth.session_info(&session.session_token)?;
//! println!("{} expires at {}", info.email, info.expiration);
//!
//! // Rotate, then sign out everywhere
//! let session = auth.session_refresh(&session.session_token)?;
//! auth.session_invalidate(&session.session_token, InvalidateType::All)?;
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Sign-in**: email one-time code, social OAuth2
//! - **Sessions**: info, refresh, invalidate
//!
//! Every failure is returned as an [`Error`]: lifecycle misuse
//! (`NotInitialized`, `AlreadyInitialized`), a connection failure, or the
//! service's own [`ErrorCode`].

pub mod api;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{CodeAuth, SdkConfig};
pub use codeauth_session::{CacheConfig, CacheStats, SessionCache};
pub use error::{Error, Result};
pub use transport::{HttpTransport, HttpTransportConfig, Transport, TransportError};
pub use types::{ErrorCode, InvalidateType, JsonObject, SessionRecord, SocialSignIn, SocialType};
