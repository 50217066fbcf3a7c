//! Prompt templates and prompt construction.
//!
//! Everything here is a pure function of its inputs: the same history and
//! options always produce the same prompt text.

use crate::models::{ConversationTurn, Role};
use crate::options::{ArtOptions, RequestOptions, Subject, WritingMode};
use crate::{Error, Result};

pub const CHAT_CONTEXT: &str = include_str!("../data/prompts/chat_context.txt");
pub const HOMEWORK_TEXT: &str = include_str!("../data/prompts/homework_text.txt");
pub const HOMEWORK_IMAGE: &str = include_str!("../data/prompts/homework_image.txt");
pub const IMAGE_ATTACHMENT: &str = include_str!("../data/prompts/image_attachment.txt");

const STEPS_DETAILED: &str = "Provide a detailed step-by-step solution. Explain each step clearly.";
const STEPS_BRIEF: &str = "Provide the final answer with a brief explanation.";

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.trim_end().to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Collapse a conversation into one block of text.
///
/// A single turn is passed through verbatim; longer histories are labelled
/// per speaker and wrapped in the conversation template.
pub fn context_block(history: &[ConversationTurn]) -> String {
    match history {
        [] => String::new(),
        [only] => only.content.clone(),
        turns => {
            let conversation = turns
                .iter()
                .map(|turn| match turn.role {
                    Role::User => format!("User: {}", turn.content),
                    Role::Assistant => format!("Assistant: {}", turn.content),
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            render(CHAT_CONTEXT, &[("conversation", &conversation)])
        }
    }
}

fn steps_instruction(show_steps: bool) -> &'static str {
    if show_steps {
        STEPS_DETAILED
    } else {
        STEPS_BRIEF
    }
}

fn writing_prompt(mode: WritingMode, tone: &str, text: &str) -> String {
    match mode {
        WritingMode::Rewrite => format!(
            "Rewrite the following text to make it better while keeping the same meaning:\n\n{}",
            text
        ),
        WritingMode::Summarize => format!("Summarize the following text concisely:\n\n{}", text),
        WritingMode::Expand => format!(
            "Expand the following text with more details and explanations:\n\n{}",
            text
        ),
        WritingMode::Grammar => format!(
            "Fix all grammar, spelling, and punctuation errors in the following text. Only return the corrected text:\n\n{}",
            text
        ),
        WritingMode::Tone => format!(
            "Rewrite the following text in a {} tone:\n\n{}",
            tone, text
        ),
    }
}

fn homework_text_prompt(subject: Subject, show_steps: bool, question: &str) -> String {
    render(
        HOMEWORK_TEXT,
        &[
            ("subject", subject.name()),
            ("steps", steps_instruction(show_steps)),
            ("question", question),
        ],
    )
}

/// Build the prompt for a text-only request.
pub fn build_prompt(history: &[ConversationTurn], options: &RequestOptions) -> Result<String> {
    if history.is_empty() {
        return Err(Error::InvalidRequest(
            "conversation history is empty".to_string(),
        ));
    }

    let context = context_block(history);

    Ok(match options {
        RequestOptions::Chat => context,
        RequestOptions::Writing { mode, tone } => writing_prompt(*mode, tone.name(), &context),
        RequestOptions::Homework {
            subject,
            show_steps,
        } => homework_text_prompt(*subject, *show_steps, &context),
    })
}

/// Build the prompt that accompanies an inline image.
///
/// The history is optional here: for homework it only supplies additional
/// context to the image.
pub fn build_image_prompt(history: &[ConversationTurn], options: &RequestOptions) -> String {
    let context = context_block(history);

    match options {
        RequestOptions::Homework {
            subject,
            show_steps,
        } => {
            let extra = if context.trim().is_empty() {
                String::new()
            } else {
                format!("\n\nAdditional context: {}", context)
            };
            render(
                HOMEWORK_IMAGE,
                &[
                    ("subject", subject.name()),
                    ("steps", steps_instruction(*show_steps)),
                    ("context", &extra),
                ],
            )
        }
        RequestOptions::Chat => with_attachment(&context),
        RequestOptions::Writing { mode, tone } => {
            with_attachment(&writing_prompt(*mode, tone.name(), &context))
        }
    }
}

fn with_attachment(prompt: &str) -> String {
    render(IMAGE_ATTACHMENT, &[("prompt", prompt.trim())])
        .trim_start()
        .to_string()
}

/// User text followed by the style and mood modifiers.
pub fn enhance_art_prompt(prompt: &str, options: &ArtOptions) -> String {
    format!(
        "{}, {}, {}, high quality, detailed",
        prompt.trim(),
        options.style.modifier(),
        options.mood.modifier()
    )
}
