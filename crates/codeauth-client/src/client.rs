//! Main client implementation.

use std::sync::OnceLock;
use std::time::Duration;

use codeauth_session::{CacheConfig, SessionCache};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::transport::{HttpTransport, HttpTransportConfig, Transport, TransportError};
use crate::types::{ErrorCode, JsonObject, SessionRecord};

/// Default cache window.
const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(30);

/// Settings fixed by [`CodeAuth::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkConfig {
    /// Project endpoint (host and optional path prefix, no scheme).
    pub endpoint: String,
    /// Project ID.
    pub project_id: String,
    /// Whether session records are cached.
    pub cache_enabled: bool,
    /// Lifetime of one cache generation.
    pub cache_window: Duration,
}

impl SdkConfig {
    /// Create a config with caching enabled for the default window.
    pub fn new(endpoint: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            cache_enabled: true,
            cache_window: DEFAULT_CACHE_WINDOW,
        }
    }

    /// Enable caching with the given window.
    pub fn with_cache(mut self, window: Duration) -> Self {
        self.cache_enabled = true;
        self.cache_window = window;
        self
    }

    /// Enable caching with a window given in whole seconds.
    pub fn with_cache_secs(self, secs: u64) -> Self {
        self.with_cache(Duration::from_secs(secs))
    }

    /// Disable caching.
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Session cache configuration derived from these settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_enabled(self.cache_enabled)
            .with_window(self.cache_window)
    }
}

/// State created once by [`CodeAuth::initialize`].
pub(crate) struct Initialized {
    pub(crate) config: SdkConfig,
    pub(crate) cache: SessionCache<SessionRecord>,
}

/// CodeAuth API client.
///
/// Wraps the service's sign-in and session endpoints and keeps a short-lived
/// cache of session records so repeated [`session_info`](Self::session_info)
/// calls for the same token do not hit the network. The client is `Send +
/// Sync`; share it by reference or `Arc` across threads.
///
/// The cache lock is only held around in-memory checks and updates, never
/// across a network call. A lookup, the request, and the follow-up write are
/// separate critical sections, so concurrent writers to the same token race
/// and the last write wins until the generation expires.
///
/// # Example
///
/// ```no_run
/// use codeauth_client::{CodeAuth, SdkConfig};
///
/// # fn example() -> codeauth_client::Result<()> {
/// let auth = CodeAuth::new()?;
/// auth.initialize(SdkConfig::new("api.example.com", "proj1").with_cache_secs(30))?;
///
/// let session = auth.sign_in_email_verify("a@b.com", "123456")?;
/// let info = auth.session_info(&session.session_token)?;
/// assert_eq!(info.email, "a@b.com");
/// # Ok(())
/// # }
/// ```
pub struct CodeAuth<T: Transport = HttpTransport> {
    /// How requests reach the service.
    transport: T,
    /// Write-once configuration and cache.
    state: OnceLock<Initialized>,
}

impl CodeAuth<HttpTransport> {
    /// Create an uninitialized client using HTTPS.
    pub fn new() -> Result<Self> {
        Self::with_http_config(HttpTransportConfig::new())
    }

    /// Create an uninitialized client with a custom HTTP transport config.
    pub fn with_http_config(config: HttpTransportConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> CodeAuth<T> {
    /// Create an uninitialized client over any transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            state: OnceLock::new(),
        }
    }

    /// Create a client and initialize it in one step.
    pub fn initialized(transport: T, config: SdkConfig) -> Self {
        let client = Self::with_transport(transport);
        client.state.get_or_init(|| Initialized::new(config));
        client
    }

    /// Fix the configuration and start the session cache.
    ///
    /// Only the first call succeeds; later calls return
    /// [`Error::AlreadyInitialized`] and leave the configuration unchanged.
    pub fn initialize(&self, config: SdkConfig) -> Result<()> {
        if self.state.get().is_some() {
            return Err(Error::AlreadyInitialized);
        }

        self.state
            .set(Initialized::new(config))
            .map_err(|_| Error::AlreadyInitialized)
    }

    /// Check whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Get the configuration, once initialized.
    pub fn config(&self) -> Option<&SdkConfig> {
        self.state.get().map(|s| &s.config)
    }

    /// Get the session cache, once initialized.
    pub fn cache(&self) -> Option<&SessionCache<SessionRecord>> {
        self.state.get().map(|s| &s.cache)
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal request plumbing
    // ─────────────────────────────────────────────────────────────────────────

    /// Check preconditions shared by every operation.
    ///
    /// Fails with [`Error::NotInitialized`] before any I/O, then lets the cache
    /// drop an expired generation.
    pub(crate) fn begin(&self) -> Result<&Initialized> {
        let state = self.state.get().ok_or(Error::NotInitialized)?;
        state.cache.check_epoch();
        Ok(state)
    }

    /// Send one request and decode the success body.
    pub(crate) fn call<R, S>(&self, state: &Initialized, path: &str, request: &R) -> Result<S>
    where
        R: Serialize,
        S: DeserializeOwned,
    {
        let body = match serde_json::to_value(request).map_err(TransportError::from)? {
            Value::Object(body) => body,
            other => {
                return Err(TransportError::InvalidRequest(format!(
                    "expected a JSON object, got {}",
                    other
                ))
                .into());
            }
        };

        let response = self
            .transport
            .post(&state.config.endpoint, path, &body)
            .map_err(|e| {
                warn!(path = %path, error = %e, "CodeAuth request failed");
                Error::Connection(e)
            })?;

        let response = check_error(path, response)?;

        serde_json::from_value(Value::Object(response)).map_err(|e| {
            warn!(path = %path, error = %e, "CodeAuth response did not match expected shape");
            Error::Connection(TransportError::Json(e))
        })
    }
}

impl<T: Transport + Default> Default for CodeAuth<T> {
    fn default() -> Self {
        Self::with_transport(T::default())
    }
}

impl<T: Transport> std::fmt::Debug for CodeAuth<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeAuth")
            .field("config", &self.config())
            .finish_non_exhaustive()
    }
}

impl Initialized {
    fn new(config: SdkConfig) -> Self {
        let cache_config = config.cache_config();
        if cache_config.is_short_window() {
            warn!(
                window_secs = cache_config.window.as_secs_f64(),
                "Cache window under 15 seconds does little to mitigate rate limits"
            );
        }

        info!(
            endpoint = %config.endpoint,
            project_id = %config.project_id,
            cache_enabled = config.cache_enabled,
            cache_window_secs = config.cache_window.as_secs(),
            "CodeAuth initialized"
        );

        Self {
            cache: SessionCache::new(cache_config),
            config,
        }
    }
}

/// Split a response into success or the reported error code.
fn check_error(path: &str, response: JsonObject) -> Result<JsonObject> {
    let code = match response.get("error") {
        Some(Value::String(code)) => ErrorCode::from(code.as_str()),
        Some(other) => ErrorCode::Unknown(other.to_string()),
        None => ErrorCode::Unknown(String::new()),
    };

    if code.is_success() {
        Ok(response)
    } else {
        debug!(path = %path, code = %code, "CodeAuth reported an error");
        Err(Error::Remote(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_sdk_config_builders() {
        let config = SdkConfig::new("api.example.com", "proj1");
        assert!(config.cache_enabled);
        assert_eq!(config.cache_window, Duration::from_secs(30));

        let config = config.with_cache_secs(5);
        assert_eq!(config.cache_config().window, Duration::from_secs(5));

        let config = config.without_cache();
        assert!(!config.cache_config().enabled);
    }

    #[test]
    fn test_check_error_success() {
        let response = object(json!({"error": "no_error", "email": "a@b.com"}));
        let response = check_error("/session/info", response).unwrap();
        assert_eq!(response["email"], "a@b.com");
    }

    #[test]
    fn test_check_error_remote() {
        let response = object(json!({"error": "bad_session_token"}));
        let err = check_error("/session/info", response).unwrap_err();
        assert!(matches!(err, Error::Remote(ErrorCode::BadSessionToken)));
    }

    #[test]
    fn test_check_error_missing_field() {
        let err = check_error("/session/info", JsonObject::new()).unwrap_err();
        assert!(matches!(err, Error::Remote(ErrorCode::Unknown(ref c)) if c.is_empty()));
    }

    #[test]
    fn test_check_error_non_string_field() {
        let response = object(json!({"error": 42}));
        let err = check_error("/session/info", response).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Unknown("42".to_string())));
    }

    struct NeverSends;

    impl Transport for NeverSends {
        fn post(
            &self,
            _endpoint: &str,
            _path: &str,
            _body: &JsonObject,
        ) -> std::result::Result<JsonObject, TransportError> {
            panic!("request should have been rejected before sending");
        }
    }

    #[test]
    fn test_non_object_request_is_rejected_before_sending() {
        let client = CodeAuth::initialized(NeverSends, SdkConfig::new("api.example.com", "proj1"));
        let state = client.begin().unwrap();

        let err = client
            .call::<_, crate::types::Empty>(state, "/signin/email", &"not an object")
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Connection(TransportError::InvalidRequest(_))
        ));
        assert!(err.to_string().contains("invalid request body"));
        assert_eq!(err.code(), Some(ErrorCode::ConnectionError));
    }
}
