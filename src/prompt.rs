//! System prompt and upstream message-list construction

use crate::history::{ConversationTurn, HISTORY_WINDOW};
use crate::llm::ChatMessage;

/// Fixed voice-assistant persona instruction
///
/// Replies are spoken aloud, so the instruction steers the model away from
/// formatting that reads badly as speech.
pub const SYSTEM_PROMPT: &str = "You are a helpful voice assistant. \
    Keep responses concise and conversational, suitable for being spoken aloud. \
    Avoid lists, markdown, and other visual formatting. \
    You do not have access to real-time data such as weather or news.";

/// Build the upstream message list for one user message
///
/// Layout: the fixed system instruction, at most the last
/// [`HISTORY_WINDOW`] history turns oldest-first and unmodified, then the
/// new user message.
#[must_use]
pub fn build_messages(history: &[ConversationTurn], message: &str) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages = Vec::with_capacity(history.len() - start + 2);

    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    for turn in &history[start..] {
        messages.push(ChatMessage::from_turn(turn));
    }
    messages.push(ChatMessage::user(message));

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConversationTurn;

    #[test]
    fn test_message_layout() {
        let history = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ];
        let messages = build_messages(&history, "what time is it");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "hi");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "what time is it");
    }

    #[test]
    fn test_history_trimmed_to_window() {
        let history: Vec<ConversationTurn> = (0..25)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::user(format!("u{i}"))
                } else {
                    ConversationTurn::assistant(format!("a{i}"))
                }
            })
            .collect();

        let messages = build_messages(&history, "latest");

        // system + 10 history + new message
        assert_eq!(messages.len(), 12);
        // Exactly the most recent ten, oldest first, unmodified
        assert_eq!(messages[1].content, "a15");
        assert_eq!(messages[10].content, "u24");
        assert_eq!(messages[11].content, "latest");
    }

    #[test]
    fn test_empty_history() {
        let messages = build_messages(&[], "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, "hello");
    }
}
