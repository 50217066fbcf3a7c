//! AI service integration for text generation and image synthesis
//!
//! Text requests (chat, writing, homework) go through the generation proxy;
//! images come from a public prompt-in-URL endpoint.

pub mod client;
pub mod image;
pub mod mock;
pub mod types;

pub use client::PromptRequestClient;
pub use image::PollinationsImageClient;
pub use mock::{MockImageGenerationClient, MockPromptClient};

use crate::models::ConversationTurn;
use crate::options::{ArtOptions, RequestOptions};
use crate::Result;
use ::image::DynamicImage;
use async_trait::async_trait;

#[async_trait]
pub trait PromptService: Send + Sync {
    async fn send(&self, history: &[ConversationTurn], options: &RequestOptions) -> Result<String>;

    async fn send_with_image(
        &self,
        history: &[ConversationTurn],
        options: &RequestOptions,
        image_data: &[u8],
    ) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str, options: &ArtOptions) -> Result<DynamicImage>;
}
