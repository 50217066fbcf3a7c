use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use super::PromptService;
use crate::models::ConversationTurn;
use crate::options::RequestOptions;
use crate::{image, prompts, Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;

/// Sends prompts to the generation proxy and extracts the text answer.
///
/// The proxy owns the provider credentials; this client only carries the
/// caller's bearer token (a session access token or the backend anon key).
pub struct PromptRequestClient {
    client: Client,
    endpoint: String,
    bearer_token: String,
    timeout: Duration,
}

impl PromptRequestClient {
    pub fn new(endpoint: String, bearer_token: String, timeout: Duration) -> Self {
        Self::new_with_client(endpoint, bearer_token, timeout, Client::new())
    }

    pub fn new_with_client(
        endpoint: String,
        bearer_token: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            endpoint,
            bearer_token,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn generation_config(options: &RequestOptions) -> GenerationConfig {
        GenerationConfig {
            temperature: options.temperature(),
            max_output_tokens: options.max_output_tokens(),
        }
    }

    /// Build the text-only request envelope.
    pub fn build_request(
        history: &[ConversationTurn],
        options: &RequestOptions,
    ) -> Result<GenerateContentRequest> {
        let prompt = prompts::build_prompt(history, options)?;

        Ok(GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: Self::generation_config(options),
        })
    }

    /// Build the vision request envelope around an already JPEG-encoded image.
    pub fn build_image_request(
        history: &[ConversationTurn],
        options: &RequestOptions,
        jpeg: &[u8],
    ) -> GenerateContentRequest {
        let prompt = prompts::build_image_prompt(history, options);

        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(jpeg),
                        },
                    },
                ],
            }],
            generation_config: Self::generation_config(options),
        }
    }

    /// Serialized body of the text-only request.
    pub fn request_body(history: &[ConversationTurn], options: &RequestOptions) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&Self::build_request(history, options)?)?)
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .bearer_auth(&self.bearer_token)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to generation endpoint: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Generation API error (status {}): {}", status, body);
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse generation response: {}\nBody: {}", e, body);
            Error::Parse(format!("unexpected response shape: {}", e))
        })?;

        parsed.first_text().map(str::to_string).ok_or_else(|| {
            tracing::error!("Generation response carried no text part: {}", body);
            Error::Parse("no text in first candidate".to_string())
        })
    }
}

#[async_trait]
impl PromptService for PromptRequestClient {
    async fn send(&self, history: &[ConversationTurn], options: &RequestOptions) -> Result<String> {
        let request = Self::build_request(history, options)?;
        tracing::debug!(
            "Sending {} turn(s) to {} with {:?}",
            history.len(),
            self.endpoint,
            options
        );
        self.generate_content(&request).await
    }

    async fn send_with_image(
        &self,
        history: &[ConversationTurn],
        options: &RequestOptions,
        image_data: &[u8],
    ) -> Result<String> {
        let jpeg = image::encode_jpeg(image_data).await?;
        tracing::debug!(
            "Sending image ({} bytes as JPEG) to {} with {:?}",
            jpeg.len(),
            self.endpoint,
            options
        );

        let request = Self::build_image_request(history, options, &jpeg);
        self.generate_content(&request).await
    }
}
