//! Session token cache with whole-generation expiry.
//!
//! This crate provides the in-memory cache used by the CodeAuth client to
//! absorb bursts of repeated session lookups:
//! - A single lock guards every read and write
//! - One shared expiry clock per generation (no per-entry TTL)
//! - Expired generations are cleared wholesale before the next access
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use codeauth_session::{CacheConfig, SessionCache};
//!
//! let cache: SessionCache<String> =
//!     SessionCache::new(CacheConfig::new().with_window(Duration::from_secs(30)));
//!
//! cache.put("tok1", "a@b.com".to_string());
//! assert_eq!(cache.get("tok1").as_deref(), Some("a@b.com"));
//!
//! cache.replace("tok1", "tok2", "a@b.com".to_string());
//! assert!(!cache.contains("tok1"));
//! ```

mod cache;
mod config;
mod epoch;

pub use cache::{CacheStats, SessionCache};
pub use config::CacheConfig;
pub use epoch::Epoch;
