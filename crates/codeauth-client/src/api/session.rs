//! Session API.

use tracing::debug;

use super::{SESSION_INFO, SESSION_INVALIDATE, SESSION_REFRESH};
use crate::client::CodeAuth;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{
    Empty, SessionInfoResponse, SessionInvalidateRequest, SessionRecord, SessionTokenRequest,
};

impl<T: Transport> CodeAuth<T> {
    /// Get the session behind `session_token`.
    ///
    /// Served from the cache when the token was seen in the current
    /// generation; otherwise fetched and cached.
    pub fn session_info(&self, session_token: &str) -> Result<SessionRecord> {
        let state = self.begin()?;

        if let Some(record) = state.cache.get(session_token) {
            debug!("Session info served from cache");
            return Ok(record);
        }

        debug!("Fetching session info");
        let request = SessionTokenRequest {
            project_id: &state.config.project_id,
            session_token,
        };
        let info: SessionInfoResponse = self.call(state, SESSION_INFO, &request)?;
        let record = info.into_record(session_token);

        state.cache.put(session_token, record.clone());
        Ok(record)
    }

    /// Trade `session_token` for a new session.
    ///
    /// Always goes to the service. On success the old token leaves the cache
    /// and the new one takes its place.
    pub fn session_refresh(&self, session_token: &str) -> Result<SessionRecord> {
        let state = self.begin()?;
        debug!("Refreshing session");

        let request = SessionTokenRequest {
            project_id: &state.config.project_id,
            session_token,
        };
        let record: SessionRecord = self.call(state, SESSION_REFRESH, &request)?;

        state
            .cache
            .replace(session_token, &record.session_token, record.clone());
        Ok(record)
    }

    /// Invalidate sessions related to `session_token`.
    ///
    /// `invalidate_type` is passed through as-is; see
    /// [`InvalidateType`](crate::InvalidateType). Always goes to the service.
    /// On success the token leaves the cache.
    pub fn session_invalidate(
        &self,
        session_token: &str,
        invalidate_type: impl AsRef<str>,
    ) -> Result<()> {
        let state = self.begin()?;
        let invalidate_type = invalidate_type.as_ref();
        debug!(invalidate_type = %invalidate_type, "Invalidating session");

        let request = SessionInvalidateRequest {
            project_id: &state.config.project_id,
            session_token,
            invalidate_type,
        };
        let _: Empty = self.call(state, SESSION_INVALIDATE, &request)?;

        state.cache.remove(session_token);
        Ok(())
    }
}
