use super::error_text;
use crate::ai::PromptService;
use crate::models::ConversationTurn;
use crate::options::{RequestOptions, Tone, WritingMode};
use crate::{Error, Result};

/// Rewrites, summarizes, expands, corrects or re-tones a piece of text.
pub struct WritingAssistant<'a> {
    prompt: &'a dyn PromptService,
    output: Option<String>,
}

impl<'a> WritingAssistant<'a> {
    pub fn new(prompt: &'a dyn PromptService) -> Self {
        Self {
            prompt,
            output: None,
        }
    }

    /// Last result or error message, as it should be displayed.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// `tone` only matters for [`WritingMode::Tone`].
    pub async fn process(&mut self, mode: WritingMode, tone: Tone, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::InvalidRequest("enter some text first".to_string()));
        }

        tracing::debug!("Writing assistant: {}", mode.label());
        let history = [ConversationTurn::user(text)];
        let result = self
            .prompt
            .send(&history, &RequestOptions::Writing { mode, tone })
            .await;

        self.output = Some(match &result {
            Ok(text) => text.clone(),
            Err(e) => error_text(e),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockPromptClient;

    #[tokio::test]
    async fn test_process_sends_writing_options() {
        let prompt = MockPromptClient::new().with_response("A tidy sentence.".to_string());
        let mut writer = WritingAssistant::new(&prompt);

        let out = writer
            .process(WritingMode::Summarize, Tone::Casual, "a messy sentence")
            .await
            .unwrap();

        assert_eq!(out, "A tidy sentence.");
        assert_eq!(writer.output(), Some("A tidy sentence."));

        let requests = prompt.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].history[0].content, "a messy sentence");
        assert_eq!(
            requests[0].options,
            RequestOptions::Writing {
                mode: WritingMode::Summarize,
                tone: Tone::Casual
            }
        );
    }

    #[tokio::test]
    async fn test_default_reply_is_built_prompt() {
        let prompt = MockPromptClient::new();
        let mut writer = WritingAssistant::new(&prompt);

        let out = writer
            .process(WritingMode::Tone, Tone::Academic, "gonna be late")
            .await
            .unwrap();
        assert_eq!(
            out,
            "Rewrite the following text in a academic tone:\n\ngonna be late"
        );
    }

    #[tokio::test]
    async fn test_error_is_displayed() {
        let prompt = MockPromptClient::new().with_error("quota".to_string());
        let mut writer = WritingAssistant::new(&prompt);

        assert!(writer
            .process(WritingMode::Expand, Tone::Formal, "short")
            .await
            .is_err());
        assert!(writer.output().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let prompt = MockPromptClient::new();
        let mut writer = WritingAssistant::new(&prompt);

        let err = writer
            .process(WritingMode::Rewrite, Tone::Formal, "\n")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert_eq!(prompt.get_call_count(), 0);
    }
}
