use super::error_text;
use crate::ai::PromptService;
use crate::models::ConversationTurn;
use crate::options::{RequestOptions, Subject};
use crate::{Error, Result};

/// Solves a homework problem given as text, an image, or both.
pub struct HomeworkSolver<'a> {
    prompt: &'a dyn PromptService,
    solution: Option<String>,
}

impl<'a> HomeworkSolver<'a> {
    pub fn new(prompt: &'a dyn PromptService) -> Self {
        Self {
            prompt,
            solution: None,
        }
    }

    /// Last solution or error message, as it should be displayed.
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    /// With an image the question text becomes additional context; without
    /// one the question is required.
    pub async fn solve(
        &mut self,
        subject: Subject,
        show_steps: bool,
        question: &str,
        image: Option<&[u8]>,
    ) -> Result<String> {
        let options = RequestOptions::Homework {
            subject,
            show_steps,
        };
        let question = question.trim();

        let result = match image {
            Some(image) => {
                let history: Vec<ConversationTurn> = if question.is_empty() {
                    Vec::new()
                } else {
                    vec![ConversationTurn::user(question)]
                };
                self.prompt.send_with_image(&history, &options, image).await
            }
            None if !question.is_empty() => {
                self.prompt
                    .send(&[ConversationTurn::user(question)], &options)
                    .await
            }
            None => Err(Error::InvalidRequest(
                "Please provide a question (image or text)".to_string(),
            )),
        };

        self.solution = Some(match &result {
            Ok(text) => text.clone(),
            Err(e) => error_text(e),
        });
        result
    }
}
