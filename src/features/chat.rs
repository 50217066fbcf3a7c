use crate::ai::PromptService;
use crate::models::ConversationTurn;
use crate::options::RequestOptions;

/// Append-only chat transcript bound to a prompt service.
pub struct ChatSession<'a> {
    prompt: &'a dyn PromptService,
    turns: Vec<ConversationTurn>,
}

impl<'a> ChatSession<'a> {
    pub fn new(prompt: &'a dyn PromptService) -> Self {
        Self {
            prompt,
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Send one user message with the whole transcript as context.
    ///
    /// Returns the assistant turn appended in response, or `None` for blank
    /// input. Failures become an assistant turn carrying the error message.
    pub async fn submit(&mut self, text: &str) -> Option<&ConversationTurn> {
        if text.trim().is_empty() {
            return None;
        }

        self.turns.push(ConversationTurn::user(text));

        let reply = match self.prompt.send(&self.turns, &RequestOptions::Chat).await {
            Ok(reply) => ConversationTurn::assistant(reply),
            Err(e) => {
                tracing::warn!("Chat request failed: {}", e);
                ConversationTurn::assistant(format!(
                    "Sorry, I couldn't process your request. Error: {}",
                    e
                ))
            }
        };

        self.turns.push(reply);
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockPromptClient;
    use crate::models::Role;

    #[tokio::test]
    async fn test_submit_appends_user_and_assistant_turns() {
        let prompt = MockPromptClient::new()
            .with_response("Hi! How can I help?".to_string())
            .with_response("Sure.".to_string());
        let mut chat = ChatSession::new(&prompt);

        let reply = chat.submit("Hello").await.unwrap();
        assert_eq!(reply.content, "Hi! How can I help?");

        chat.submit("Tell me a joke").await.unwrap();

        let roles: Vec<Role> = chat.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );

        // Second request carries the full transcript up to the new question.
        let requests = prompt.requests();
        assert_eq!(requests[1].history.len(), 3);
        assert_eq!(requests[1].history[2].content, "Tell me a joke");
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let prompt = MockPromptClient::new();
        let mut chat = ChatSession::new(&prompt);

        assert!(chat.submit("   ").await.is_none());
        assert!(chat.is_empty());
        assert_eq!(prompt.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_becomes_assistant_turn() {
        let prompt = MockPromptClient::new().with_error("overloaded".to_string());
        let mut chat = ChatSession::new(&prompt);

        let reply = chat.submit("Hello").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply
            .content
            .starts_with("Sorry, I couldn't process your request. Error:"));
        assert!(reply.content.contains("overloaded"));
        assert_eq!(chat.turns().len(), 2);
    }

    #[tokio::test]
    async fn test_timestamps_are_non_decreasing() {
        let prompt = MockPromptClient::new();
        let mut chat = ChatSession::new(&prompt);

        chat.submit("one").await;
        chat.submit("two").await;

        let stamps: Vec<i64> = chat.turns().iter().map(|t| t.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
