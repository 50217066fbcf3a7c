use super::error_text;
use crate::ai::ImageGenerationService;
use crate::options::{ArtMood, ArtOptions, ArtStyle};
use crate::Result;
use image::DynamicImage;
use std::collections::VecDeque;

/// How many generations the studio remembers.
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub options: ArtOptions,
    pub image: DynamicImage,
}

/// Generates images and keeps the most recent results, newest first.
pub struct ArtStudio<'a> {
    images: &'a dyn ImageGenerationService,
    history: VecDeque<Generation>,
    last_error: Option<String>,
}

impl<'a> ArtStudio<'a> {
    pub fn new(images: &'a dyn ImageGenerationService) -> Self {
        Self {
            images,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            last_error: None,
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &Generation> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<&Generation> {
        self.history.front()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn generate(
        &mut self,
        prompt: &str,
        style: ArtStyle,
        mood: ArtMood,
    ) -> Result<&Generation> {
        let options = ArtOptions { style, mood };

        match self.images.generate_image(prompt, &options).await {
            Ok(image) => {
                self.last_error = None;
                self.history.push_front(Generation {
                    prompt: prompt.trim().to_string(),
                    options,
                    image,
                });
                self.history.truncate(HISTORY_LIMIT);
                Ok(&self.history[0])
            }
            Err(e) => {
                tracing::warn!("Image generation failed: {}", e);
                self.last_error = Some(error_text(&e));
                Err(e)
            }
        }
    }
}
