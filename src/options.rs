//! Enumerated request options that parametrize prompt text.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Physics,
    Chemistry,
    Biology,
    Coding,
    Other,
}

impl Subject {
    pub fn name(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::Coding => "Coding",
            Subject::Other => "Other",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WritingMode {
    Rewrite,
    Summarize,
    Expand,
    Grammar,
    Tone,
}

impl WritingMode {
    /// Short label shown next to a result.
    pub fn label(self) -> &'static str {
        match self {
            WritingMode::Rewrite => "Rewrite",
            WritingMode::Summarize => "Summarize",
            WritingMode::Expand => "Expand",
            WritingMode::Grammar => "Fix Grammar",
            WritingMode::Tone => "Change Tone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Casual,
    Professional,
    Friendly,
    Academic,
}

impl Tone {
    pub fn name(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Academic => "academic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ArtStyle {
    Anime,
    Realistic,
    Abstract,
    Fantasy,
    Cyberpunk,
    Watercolor,
    OilPainting,
    PixelArt,
    Minimalist,
    Surreal,
}

impl ArtStyle {
    pub fn modifier(self) -> &'static str {
        match self {
            ArtStyle::Anime => "anime style, manga illustration",
            ArtStyle::Realistic => "photorealistic, highly detailed, 8k",
            ArtStyle::Abstract => "abstract art, geometric shapes, modern",
            ArtStyle::Fantasy => "fantasy art, magical, ethereal",
            ArtStyle::Cyberpunk => "cyberpunk style, neon lights, futuristic",
            ArtStyle::Watercolor => "watercolor painting, soft colors",
            ArtStyle::OilPainting => "oil painting, classical art style",
            ArtStyle::PixelArt => "pixel art, 16-bit, retro game style",
            ArtStyle::Minimalist => "minimalist design, simple, clean",
            ArtStyle::Surreal => "surreal art, dreamlike, Salvador Dali style",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArtMood {
    Vibrant,
    Dark,
    Peaceful,
    Energetic,
    Dreamy,
    Mysterious,
}

impl ArtMood {
    pub fn modifier(self) -> &'static str {
        match self {
            ArtMood::Vibrant => "vibrant colors, bright, cheerful",
            ArtMood::Dark => "dark atmosphere, moody lighting, dramatic",
            ArtMood::Peaceful => "peaceful, serene, calm atmosphere",
            ArtMood::Energetic => "dynamic, energetic, action-packed",
            ArtMood::Dreamy => "dreamy, soft lighting, magical atmosphere",
            ArtMood::Mysterious => "mysterious, enigmatic, atmospheric",
        }
    }
}

/// Selects the instruction template and generation settings for a text
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "feature", rename_all = "lowercase")]
pub enum RequestOptions {
    Chat,
    Writing { mode: WritingMode, tone: Tone },
    Homework { subject: Subject, show_steps: bool },
}

impl RequestOptions {
    pub fn temperature(&self) -> f64 {
        match self {
            RequestOptions::Chat | RequestOptions::Writing { .. } => 0.7,
            RequestOptions::Homework { .. } => 0.4,
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self {
            RequestOptions::Chat | RequestOptions::Writing { .. } => 1024,
            RequestOptions::Homework { .. } => 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtOptions {
    pub style: ArtStyle,
    pub mood: ArtMood,
}
