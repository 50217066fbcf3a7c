use super::ImageGenerationService;
use crate::options::ArtOptions;
use crate::{image, prompts, Error, Result};
use ::image::DynamicImage;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub(crate) const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";

/// Client for the public prompt-in-URL image synthesis endpoint.
pub struct PollinationsImageClient {
    client: Client,
    base_url: String,
    width: u32,
    height: u32,
    timeout: Duration,
}

impl PollinationsImageClient {
    pub fn new(width: u32, height: u32, timeout: Duration) -> Self {
        Self::new_with_client(
            DEFAULT_BASE_URL.to_string(),
            width,
            height,
            timeout,
            Client::new(),
        )
    }

    pub fn new_with_client(
        base_url: String,
        width: u32,
        height: u32,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            width,
            height,
            timeout,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Full request URL for an already enhanced prompt.
    pub fn request_url(&self, enhanced_prompt: &str) -> String {
        format!(
            "{}/prompt/{}?width={}&height={}&nologo=true",
            self.base_url,
            urlencoding::encode(enhanced_prompt),
            self.width,
            self.height
        )
    }
}

#[async_trait]
impl ImageGenerationService for PollinationsImageClient {
    async fn generate_image(&self, prompt: &str, options: &ArtOptions) -> Result<DynamicImage> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "describe the image you want to create".to_string(),
            ));
        }

        let enhanced_prompt = prompts::enhance_art_prompt(prompt, options);
        tracing::debug!("Requesting image for prompt: {}", enhanced_prompt);

        let response = self
            .client
            .get(self.request_url(&enhanced_prompt))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send image request: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Image API error (status {}): {}", status, body);
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Image API returned {} bytes", bytes.len());
        image::decode(&bytes)
    }
}
