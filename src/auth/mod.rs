//! Email/password authentication against the backend-as-a-service
//!
//! The backend owns accounts and sessions. Callers hold the current session
//! in an explicit [`SessionContext`] and hand it to whatever needs it.

pub mod client;
pub mod mock;

pub use client::SupabaseAuthClient;
pub use mock::MockAuthClient;

use crate::models::Session;
use crate::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Returns a session when the backend signs the new user in immediately.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn sign_out(&self, session: &Session) -> Result<()>;
}

pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::InvalidRequest("email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::InvalidRequest("password is required".to_string()));
    }
    Ok(())
}

/// The signed-in state of one user, passed explicitly to its consumers.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user_email(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.user.email.as_deref())
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user.id.as_str())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    /// Token for authenticated requests, or `fallback` when signed out.
    pub fn bearer_token<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.access_token().unwrap_or(fallback)
    }

    pub async fn sign_up(
        &mut self,
        auth: &dyn AuthService,
        email: &str,
        password: &str,
    ) -> Result<()> {
        if let Some(session) = auth.sign_up(email, password).await? {
            tracing::info!("Signed up and signed in as {}", email);
            self.session = Some(session);
        } else {
            tracing::info!("Signed up {}; awaiting email confirmation", email);
        }
        Ok(())
    }

    pub async fn sign_in(
        &mut self,
        auth: &dyn AuthService,
        email: &str,
        password: &str,
    ) -> Result<()> {
        let session = auth.sign_in(email, password).await?;
        tracing::info!("Signed in as user {}", session.user.id);
        self.session = Some(session);
        Ok(())
    }

    /// Revoke the current session. Signed-out contexts are left untouched.
    pub async fn sign_out(&mut self, auth: &dyn AuthService) -> Result<()> {
        if let Some(session) = &self.session {
            auth.sign_out(session).await?;
            tracing::info!("Signed out user {}", session.user.id);
        }
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_starts_signed_out() {
        let ctx = SessionContext::new();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.current_user_email(), None);
        assert_eq!(ctx.current_user_id(), None);
        assert_eq!(ctx.bearer_token("anon"), "anon");
    }

    #[tokio::test]
    async fn test_sign_in_and_out_updates_context() {
        let auth = MockAuthClient::new().with_user("a@example.com", "hunter22");
        let mut ctx = SessionContext::new();

        ctx.sign_in(&auth, "a@example.com", "hunter22").await.unwrap();
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.current_user_email(), Some("a@example.com"));
        assert!(ctx.current_user_id().is_some());
        assert_ne!(ctx.bearer_token("anon"), "anon");

        ctx.sign_out(&auth).await.unwrap();
        assert!(!ctx.is_authenticated());
        assert_eq!(auth.get_sign_out_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_previous_state() {
        let auth = MockAuthClient::new().with_user("a@example.com", "hunter22");
        let mut ctx = SessionContext::new();

        let err = ctx
            .sign_in(&auth, "a@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { .. }));
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_up_with_confirmation_stays_signed_out() {
        let auth = MockAuthClient::new().requiring_confirmation();
        let mut ctx = SessionContext::new();

        ctx.sign_up(&auth, "new@example.com", "secret").await.unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_when_signed_out_is_noop() {
        let auth = MockAuthClient::new();
        let mut ctx = SessionContext::new();

        ctx.sign_out(&auth).await.unwrap();
        assert_eq!(auth.get_sign_out_count(), 0);
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("a@example.com", "pw").is_ok());
        assert!(validate_credentials("  ", "pw").is_err());
        assert!(validate_credentials("a@example.com", "").is_err());
        assert!(validate_credentials("a@example.com", "   ").is_err());
    }
}
