//! Application wiring: builds the service clients for one user session and
//! hands out feature state holders.

use crate::ai::{
    ImageGenerationService, PollinationsImageClient, PromptRequestClient, PromptService,
};
use crate::auth::{AuthService, SessionContext, SupabaseAuthClient};
use crate::features::{ArtStudio, ChatSession, HomeworkSolver, WritingAssistant};
use crate::models::Config;
use crate::Result;
use tracing::info;

/// Owns the clients and the session context they were built for.
pub struct App {
    prompt: Box<dyn PromptService>,
    image_gen: Box<dyn ImageGenerationService>,
    auth: Box<dyn AuthService>,
    session: SessionContext,
    backend: Option<Backend>,
}

/// What the real prompt client is rebuilt from when the session changes.
struct Backend {
    config: Config,
    http_client: reqwest::Client,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub prompt: Box<dyn PromptService>,
    pub image_gen: Box<dyn ImageGenerationService>,
    pub auth: Box<dyn AuthService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, session: SessionContext) -> Self {
        Self {
            prompt: services.prompt,
            image_gen: services.image_gen,
            auth: services.auth,
            session,
            backend: None,
        }
    }

    /// Auth client for `config`, sharing `http_client`'s connection pool.
    pub fn auth_client(config: &Config, http_client: reqwest::Client) -> SupabaseAuthClient {
        SupabaseAuthClient::new_with_client(
            config.backend_url.clone(),
            config.backend_anon_key.clone(),
            config.request_timeout,
            http_client,
        )
    }

    /// Construct an app for an already established (or empty) session.
    ///
    /// Generation requests carry the session's access token, falling back to
    /// the backend's anon key when nobody is signed in.
    pub fn new(
        config: &Config,
        http_client: reqwest::Client,
        auth: Box<dyn AuthService>,
        session: SessionContext,
    ) -> Self {
        let prompt = Self::prompt_client(config, &http_client, &session);
        let image_gen = PollinationsImageClient::new_with_client(
            config.image_base_url.clone(),
            config.image_width,
            config.image_height,
            config.request_timeout,
            http_client.clone(),
        );

        let mut app = Self::with_services(
            AppServices {
                prompt: Box::new(prompt),
                image_gen: Box::new(image_gen),
                auth,
            },
            session,
        );
        app.backend = Some(Backend {
            config: config.clone(),
            http_client,
        });
        app
    }

    fn prompt_client(
        config: &Config,
        http_client: &reqwest::Client,
        session: &SessionContext,
    ) -> PromptRequestClient {
        match session.current_user_email() {
            Some(email) => info!("Generation requests authenticated as {}", email),
            None => info!("Generation requests use the anonymous backend key"),
        }

        PromptRequestClient::new_with_client(
            config.generate_url.clone(),
            session.bearer_token(&config.backend_anon_key).to_string(),
            config.request_timeout,
            http_client.clone(),
        )
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn chat(&self) -> ChatSession<'_> {
        ChatSession::new(self.prompt.as_ref())
    }

    pub fn writing(&self) -> WritingAssistant<'_> {
        WritingAssistant::new(self.prompt.as_ref())
    }

    pub fn homework(&self) -> HomeworkSolver<'_> {
        HomeworkSolver::new(self.prompt.as_ref())
    }

    pub fn art(&self) -> ArtStudio<'_> {
        ArtStudio::new(self.image_gen.as_ref())
    }

    /// Create an account. Backends that sign new users in immediately switch
    /// later requests to the new session's token.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<()> {
        self.session
            .sign_up(self.auth.as_ref(), email, password)
            .await?;
        self.refresh_prompt_client();
        Ok(())
    }

    /// Revoke the session, if any. Later requests fall back to the anon key.
    pub async fn sign_out(&mut self) -> Result<()> {
        self.session.sign_out(self.auth.as_ref()).await?;
        self.refresh_prompt_client();
        Ok(())
    }

    fn refresh_prompt_client(&mut self) {
        if let Some(backend) = &self.backend {
            self.prompt = Box::new(Self::prompt_client(
                &backend.config,
                &backend.http_client,
                &self.session,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockImageGenerationClient, MockPromptClient};
    use crate::auth::MockAuthClient;
    use crate::options::{ArtMood, ArtStyle, Subject};
    use std::collections::HashMap;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let vars: HashMap<&str, String> = HashMap::from([
            ("OMNIAI_BACKEND_URL", server.uri()),
            ("OMNIAI_BACKEND_ANON_KEY", "anon-key".to_string()),
            ("OMNIAI_IMAGE_BASE_URL", server.uri()),
        ]);
        Config::from_vars(|key| vars.get(key).cloned()).unwrap()
    }

    async fn mount_generate(server: &MockServer, bearer: &str) {
        Mock::given(method("POST"))
            .and(path("/functions/v1/generate"))
            .and(header("authorization", format!("Bearer {}", bearer).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_signed_out_uses_anon_key() {
        let server = MockServer::start().await;
        mount_generate(&server, "anon-key").await;

        let config = config_for(&server);
        let app = App::new(
            &config,
            reqwest::Client::new(),
            Box::new(MockAuthClient::new()),
            SessionContext::new(),
        );

        let mut chat = app.chat();
        assert_eq!(chat.submit("hello").await.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn test_signed_in_uses_session_token() {
        let server = MockServer::start().await;
        mount_generate(&server, "mock-token-ada@example.com").await;

        let auth = MockAuthClient::new().with_user("ada@example.com", "pw");
        let mut session = SessionContext::new();
        session.sign_in(&auth, "ada@example.com", "pw").await.unwrap();

        let config = config_for(&server);
        let mut app = App::new(&config, reqwest::Client::new(), Box::new(auth), session);
        assert!(app.session().is_authenticated());

        let answer = app
            .homework()
            .solve(Subject::Math, true, "1 + 1", None)
            .await
            .unwrap();
        assert_eq!(answer, "ok");

        app.sign_out().await.unwrap();
        assert!(!app.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_requests_after_sign_out_use_anon_key() {
        let server = MockServer::start().await;
        mount_generate(&server, "anon-key").await;

        let auth = MockAuthClient::new().with_user("ada@example.com", "pw");
        let mut session = SessionContext::new();
        session.sign_in(&auth, "ada@example.com", "pw").await.unwrap();

        let config = config_for(&server);
        let mut app = App::new(&config, reqwest::Client::new(), Box::new(auth), session);
        app.sign_out().await.unwrap();

        let mut chat = app.chat();
        assert_eq!(chat.submit("hello").await.unwrap().content, "ok");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].headers.get("authorization").unwrap(),
            "Bearer anon-key"
        );
    }

    #[tokio::test]
    async fn test_sign_up_switches_to_new_session_token() {
        let server = MockServer::start().await;
        mount_generate(&server, "mock-token-new@example.com").await;

        let config = config_for(&server);
        let mut app = App::new(
            &config,
            reqwest::Client::new(),
            Box::new(MockAuthClient::new()),
            SessionContext::new(),
        );
        app.sign_up("new@example.com", "pw").await.unwrap();
        assert_eq!(app.session().current_user_email(), Some("new@example.com"));

        let mut chat = app.chat();
        assert_eq!(chat.submit("hello").await.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn test_with_services_routes_features_to_mocks() {
        let app = App::with_services(
            AppServices {
                prompt: Box::new(MockPromptClient::new().with_response("done".to_string())),
                image_gen: Box::new(MockImageGenerationClient::new()),
                auth: Box::new(MockAuthClient::new()),
            },
            SessionContext::new(),
        );

        let mut studio = app.art();
        studio
            .generate("a kite", ArtStyle::Minimalist, ArtMood::Energetic)
            .await
            .unwrap();
        assert_eq!(studio.history().count(), 1);

        let mut writer = app.writing();
        let out = writer
            .process(
                crate::options::WritingMode::Rewrite,
                crate::options::Tone::Formal,
                "hey",
            )
            .await
            .unwrap();
        assert_eq!(out, "done");
    }
}
