//! Sign-in API.

use tracing::debug;

use super::{SIGNIN_EMAIL, SIGNIN_EMAIL_VERIFY, SIGNIN_SOCIAL, SIGNIN_SOCIAL_VERIFY};
use crate::client::CodeAuth;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{
    Empty, SessionRecord, SignInEmailRequest, SignInEmailVerifyRequest, SignInSocialRequest,
    SignInSocialVerifyRequest, SocialSignIn,
};

impl<T: Transport> CodeAuth<T> {
    /// Send a one-time sign-in code to `email`.
    pub fn sign_in_email(&self, email: &str) -> Result<()> {
        let state = self.begin()?;
        debug!("Requesting email sign-in code");

        let request = SignInEmailRequest {
            project_id: &state.config.project_id,
            email,
        };
        let _: Empty = self.call(state, SIGNIN_EMAIL, &request)?;
        Ok(())
    }

    /// Exchange an emailed one-time code for a session.
    ///
    /// The new session is cached when caching is enabled.
    pub fn sign_in_email_verify(&self, email: &str, code: &str) -> Result<SessionRecord> {
        let state = self.begin()?;
        debug!("Verifying email sign-in code");

        let request = SignInEmailVerifyRequest {
            project_id: &state.config.project_id,
            email,
            code,
        };
        let record: SessionRecord = self.call(state, SIGNIN_EMAIL_VERIFY, &request)?;

        state.cache.put(&record.session_token, record.clone());
        Ok(record)
    }

    /// Start a social OAuth2 sign-in and get the provider URL.
    ///
    /// `social_type` is passed through as-is; see [`SocialType`](crate::SocialType).
    pub fn sign_in_social(&self, social_type: impl AsRef<str>) -> Result<SocialSignIn> {
        let state = self.begin()?;
        let social_type = social_type.as_ref();
        debug!(social_type = %social_type, "Requesting social sign-in URL");

        let request = SignInSocialRequest {
            project_id: &state.config.project_id,
            social_type,
        };
        self.call(state, SIGNIN_SOCIAL, &request)
    }

    /// Exchange a social provider's authorization code for a session.
    ///
    /// The new session is cached when caching is enabled.
    pub fn sign_in_social_verify(
        &self,
        social_type: impl AsRef<str>,
        authorization_code: &str,
    ) -> Result<SessionRecord> {
        let state = self.begin()?;
        let social_type = social_type.as_ref();
        debug!(social_type = %social_type, "Verifying social authorization code");

        let request = SignInSocialVerifyRequest {
            project_id: &state.config.project_id,
            social_type,
            authorization_code,
        };
        let record: SessionRecord = self.call(state, SIGNIN_SOCIAL_VERIFY, &request)?;

        state.cache.put(&record.session_token, record.clone());
        Ok(record)
    }
}
