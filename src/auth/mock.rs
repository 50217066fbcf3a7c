use super::{validate_credentials, AuthService};
use crate::models::{Session, User};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory account store standing in for the auth backend.
#[derive(Clone)]
pub struct MockAuthClient {
    accounts: Arc<Mutex<HashMap<String, String>>>,
    require_confirmation: bool,
    sign_out_count: Arc<Mutex<usize>>,
}

impl MockAuthClient {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            require_confirmation: false,
            sign_out_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Sign-ups succeed but return no session.
    pub fn requiring_confirmation(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    pub fn get_sign_out_count(&self) -> usize {
        *self.sign_out_count.lock().unwrap()
    }

    fn session_for(email: &str) -> Session {
        Session {
            access_token: format!("mock-token-{}", email),
            refresh_token: None,
            expires_in: Some(3600),
            user: User {
                id: format!("mock-user-{}", email),
                email: Some(email.to_string()),
            },
        }
    }
}

impl Default for MockAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for MockAuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>> {
        validate_credentials(email, password)?;

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(Error::Auth {
                status: 422,
                body: "User already registered".to_string(),
            });
        }
        accounts.insert(email.to_string(), password.to_string());

        if self.require_confirmation {
            Ok(None)
        } else {
            Ok(Some(Self::session_for(email)))
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(stored) if stored == password => Ok(Self::session_for(email)),
            _ => Err(Error::Auth {
                status: 400,
                body: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        *self.sign_out_count.lock().unwrap() += 1;
        Ok(())
    }
}
