use super::{ImageGenerationService, PromptService};
use crate::models::ConversationTurn;
use crate::options::{ArtOptions, RequestOptions};
use crate::{prompts, Error, Result};
use ::image::{DynamicImage, Rgba, RgbaImage};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A request observed by [`MockPromptClient`].
#[derive(Debug, Clone)]
pub struct RecordedPrompt {
    pub history: Vec<ConversationTurn>,
    pub options: RequestOptions,
    pub image_len: Option<usize>,
}

/// Scripted prompt client.
///
/// Replies cycle through the configured responses; with none configured it
/// echoes the built prompt.
pub struct MockPromptClient {
    responses: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    requests: Arc<Mutex<Vec<RecordedPrompt>>>,
}

impl MockPromptClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    /// Queue a failure that surfaces as a provider error with status 500.
    pub fn with_error(self, body: String) -> Self {
        self.responses.lock().unwrap().push(Err(body));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedPrompt> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, recorded: RecordedPrompt, fallback: String) -> Result<String> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(recorded);

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(fallback);
        }

        let index = (requests.len() - 1) % responses.len();
        responses[index].clone().map_err(|body| Error::Provider { status: 500, body })
    }
}

impl Default for MockPromptClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptService for MockPromptClient {
    async fn send(&self, history: &[ConversationTurn], options: &RequestOptions) -> Result<String> {
        let prompt = prompts::build_prompt(history, options)?;
        self.respond(
            RecordedPrompt {
                history: history.to_vec(),
                options: *options,
                image_len: None,
            },
            prompt,
        )
    }

    async fn send_with_image(
        &self,
        history: &[ConversationTurn],
        options: &RequestOptions,
        image_data: &[u8],
    ) -> Result<String> {
        let prompt = prompts::build_image_prompt(history, options);
        self.respond(
            RecordedPrompt {
                history: history.to_vec(),
                options: *options,
                image_len: Some(image_data.len()),
            },
            prompt,
        )
    }
}

/// Image generator returning a fixed-size solid image, or scripted images.
pub struct MockImageGenerationClient {
    images: Arc<Mutex<Vec<DynamicImage>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            images: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_response(self, image: DynamicImage) -> Self {
        self.images.lock().unwrap().push(image);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Enhanced prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str, options: &ArtOptions) -> Result<DynamicImage> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "describe the image you want to create".to_string(),
            ));
        }

        let mut seen = self.prompts.lock().unwrap();
        seen.push(prompts::enhance_art_prompt(prompt, options));

        let images = self.images.lock().unwrap();
        if images.is_empty() {
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                1,
                1,
                Rgba([0, 0, 0, 255]),
            )))
        } else {
            let index = (seen.len() - 1) % images.len();
            Ok(images[index].clone())
        }
    }
}
