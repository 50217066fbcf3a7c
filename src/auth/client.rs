use super::{validate_credentials, AuthService};
use crate::models::Session;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// REST client for the backend's email/password auth endpoints.
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
    timeout: Duration,
}

impl SupabaseAuthClient {
    pub fn new(base_url: String, anon_key: String, timeout: Duration) -> Self {
        Self::new_with_client(base_url, anon_key, timeout, Client::new())
    }

    pub fn new_with_client(
        base_url: String,
        anon_key: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            timeout,
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/auth/v1/{}", self.base_url, path))
            .timeout(self.timeout)
            .header("apikey", &self.anon_key)
    }

    async fn check(response: Response, action: &str) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("{} failed (status {}): {}", action, status, body);
            return Err(Error::Auth {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl AuthService for SupabaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>> {
        validate_credentials(email, password)?;

        let response = self
            .post("signup")
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = Self::check(response, "Sign-up").await?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("invalid sign-up response: {}", e)))?;

        // Without email confirmation the backend answers with a full session,
        // otherwise with the bare user record.
        if value.get("access_token").is_none() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::Parse(format!("invalid sign-up session: {}", e)))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let response = self
            .post("token")
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = Self::check(response, "Sign-in").await?;

        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("invalid sign-in session: {}", e)))
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let response = self
            .post("logout")
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        Self::check(response, "Sign-out").await?;
        Ok(())
    }
}
