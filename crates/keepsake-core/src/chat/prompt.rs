//! Prompt composition for a conversation turn.
//!
//! Layout sent to the completion provider:
//! `[system persona, system "Current memories: ..."] + history + user`.

use keepsake_types::llm::Message;
use keepsake_types::memory::MemoryRecord;

/// Flatten records to `"YYYY-MM-DD: content"` lines.
pub fn summarize_memories(records: &[MemoryRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| format!("{}: {}", r.created_at.format("%Y-%m-%d"), r.content))
        .collect()
}

/// Render the memory system message.
pub fn memory_message(summaries: &[String]) -> String {
    if summaries.is_empty() {
        "Current memories: none".to_string()
    } else {
        format!("Current memories: {}", summaries.join("; "))
    }
}

/// Build the full message list for one turn.
///
/// `history` must not already contain `user_message`.
pub fn build_messages(
    persona: &str,
    summaries: &[String],
    history: &[Message],
    user_message: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(Message::system(persona));
    messages.push(Message::system(memory_message(summaries)));
    messages.extend_from_slice(history);
    messages.push(Message::user(user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use keepsake_types::llm::MessageRole;
    use keepsake_types::memory::Timeframe;

    #[test]
    fn test_summaries_use_creation_date() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        let records = vec![
            MemoryRecord::new("Exam tomorrow", Timeframe::Day, created),
            MemoryRecord::new("Has a cat named Mochi", Timeframe::Indefinitely, created),
        ];
        assert_eq!(
            summarize_memories(&records),
            vec![
                "2024-05-01: Exam tomorrow".to_string(),
                "2024-05-01: Has a cat named Mochi".to_string(),
            ]
        );
    }

    #[test]
    fn test_memory_message_when_empty() {
        assert_eq!(memory_message(&[]), "Current memories: none");
    }

    #[test]
    fn test_build_messages_order() {
        let history = vec![Message::user("hi"), Message::assistant("hey!")];
        let summaries = vec!["2024-05-01: Exam tomorrow".to_string()];
        let messages = build_messages("persona", &summaries, &history, "how are you?");

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0], Message::system("persona"));
        assert_eq!(
            messages[1],
            Message::system("Current memories: 2024-05-01: Exam tomorrow")
        );
        assert_eq!(messages[2], history[0]);
        assert_eq!(messages[3], history[1]);
        assert_eq!(messages[4].role, MessageRole::User);
        assert_eq!(messages[4].content, "how are you?");
    }
}
