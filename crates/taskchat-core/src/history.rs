use taskchat_llm::Message;
use taskchat_persist::{ChatMessage, MessageRole};

/// Fixed instruction framing every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful task management assistant. You can help users \
create, list, update, and delete tasks. Be concise and friendly. When you perform an action, \
confirm it clearly. Use the provided functions to interact with tasks.";

/// Build the prompt-ready context window: system instruction, stored history
/// minus the just-saved current turn, then the current user message.
///
/// Pure transformation; `history` must be in chronological order with the
/// current turn at the end (as returned by `MessageStore::recent` right after
/// the append).
pub fn build_context(history: &[ChatMessage], current_message: &str) -> Vec<Message> {
    let mut context = Vec::with_capacity(history.len() + 1);
    context.push(Message::system(SYSTEM_PROMPT));

    // The current turn is already persisted and sits last in `history`; skip
    // it here so it is not sent twice.
    let prior = &history[..history.len().saturating_sub(1)];
    for message in prior {
        context.push(match message.role {
            MessageRole::User => Message::human(message.content.clone()),
            MessageRole::Assistant => Message::ai(message.content.clone()),
        });
    }

    context.push(Message::human(current_message));
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn turn(role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage::new(Uuid::new_v4(), role, content.to_string(), None)
    }

    #[test]
    fn starts_with_system_and_ends_with_current() {
        let history = vec![
            turn(MessageRole::User, "hello"),
            turn(MessageRole::Assistant, "hi there"),
            turn(MessageRole::User, "list my tasks"),
        ];

        let context = build_context(&history, "list my tasks");

        assert_eq!(context.len(), 4);
        assert_eq!(context[0].role(), "system");
        assert_eq!(context[1].role(), "user");
        assert_eq!(context[2].role(), "assistant");
        assert_eq!(context[3].role(), "user");
    }

    #[test]
    fn excludes_the_just_saved_turn() {
        let history = vec![turn(MessageRole::User, "create a task")];
        let context = build_context(&history, "create a task");

        // system + current only; the stored copy of the current turn is skipped
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn empty_history_still_produces_a_prompt() {
        let context = build_context(&[], "first message");
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].role(), "system");
        assert_eq!(context[1].role(), "user");
    }
}
