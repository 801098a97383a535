//! Chat conversations and the message append protocol.
//!
//! Messages are stored as a JSON array string in a text column; the server
//! is the sole mutator and keeps `message_count` equal to the decoded list
//! length after every write.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::text_enum;
use crate::time::utc_format;
use crate::RecordsResult;

/// Placeholder title applied when a conversation is created without one.
pub const DEFAULT_TITLE: &str = "Nouvelle conversation";

/// Maximum length of a title derived from the first user message.
const DERIVED_TITLE_LEN: usize = 50;

text_enum! {
    ConversationStatus {
        Active => "ACTIVE",
        Archived => "ARCHIVED",
        Deleted => "DELETED",
    }
}

text_enum! {
    MessageRole {
        User => "user",
        Assistant => "assistant",
        System => "system",
    }
}

/// One message of the stored payload: `[{role, content, timestamp}, ...]`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "utc_format")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ChatConversation {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub session_id: String,
    pub title: String,
    pub messages: String,
    pub message_count: i32,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub status: ConversationStatus,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatConversation {
    /// Decode the stored messages payload into an ordered list.
    ///
    /// Empty or blank payloads are an empty list. A decoding failure is the
    /// single tolerated soft-failure of the service: it is logged and reset
    /// to an empty list so the append still succeeds.
    pub fn decode_messages(&self) -> Vec<ChatMessage> {
        let raw = self.messages.trim();
        if raw.is_empty() || raw == "[]" {
            return Vec::new();
        }
        match serde_json::from_str(raw) {
            Ok(messages) => messages,
            Err(err) => {
                tracing::warn!(
                    conversation_id = %self.id,
                    "failed to decode messages payload, resetting to empty list: {err}"
                );
                Vec::new()
            }
        }
    }

    /// Append a message: decode, push `{role, content, timestamp: now}`,
    /// re-encode, refresh `message_count` and `last_message_at`, and derive
    /// a title from the first user message while the placeholder is still
    /// in place.
    pub fn apply_message(
        &mut self,
        role: MessageRole,
        content: &str,
        now: DateTime<Utc>,
    ) -> RecordsResult<()> {
        let mut messages = self.decode_messages();
        messages.push(ChatMessage {
            role,
            content: content.to_string(),
            timestamp: now,
        });

        self.messages = serde_json::to_string(&messages)?;
        self.message_count = messages.len() as i32;
        self.last_message_at = now;
        self.updated_at = now;

        if self.title == DEFAULT_TITLE && role == MessageRole::User {
            self.title = derive_title(content);
        }

        Ok(())
    }
}

fn derive_title(content: &str) -> String {
    if content.chars().count() > DERIVED_TITLE_LEN {
        let truncated: String = content.chars().take(DERIVED_TITLE_LEN).collect();
        format!("{truncated}...")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> ChatConversation {
        let now = Utc::now();
        ChatConversation {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            session_id: "s-1".into(),
            title: DEFAULT_TITLE.into(),
            messages: "[]".into(),
            message_count: 0,
            started_at: now,
            last_message_at: now,
            status: ConversationStatus::Active,
            tags: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn append_keeps_count_in_sync() {
        let mut conv = conversation();
        conv.apply_message(MessageRole::User, "Bonjour", Utc::now())
            .unwrap();
        conv.apply_message(MessageRole::Assistant, "Bonjour, comment puis-je aider ?", Utc::now())
            .unwrap();
        assert_eq!(conv.message_count, 2);
        assert_eq!(conv.decode_messages().len(), 2);
    }

    #[test]
    fn title_derived_from_first_user_message() {
        let mut conv = conversation();
        conv.apply_message(MessageRole::Assistant, "ignored for titles", Utc::now())
            .unwrap();
        assert_eq!(conv.title, DEFAULT_TITLE);

        conv.apply_message(MessageRole::User, "Bonjour je voudrais un rendez-vous", Utc::now())
            .unwrap();
        assert_eq!(conv.title, "Bonjour je voudrais un rendez-vous");
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let mut conv = conversation();
        let content = "x".repeat(80);
        conv.apply_message(MessageRole::User, &content, Utc::now())
            .unwrap();
        assert_eq!(conv.title, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn custom_title_is_never_overwritten() {
        let mut conv = conversation();
        conv.title = "Suivi tension".into();
        conv.apply_message(MessageRole::User, "Bonjour", Utc::now())
            .unwrap();
        assert_eq!(conv.title, "Suivi tension");
    }

    #[test]
    fn malformed_payload_resets_to_empty_list() {
        let mut conv = conversation();
        conv.messages = "{not json".into();
        conv.apply_message(MessageRole::User, "Bonjour", Utc::now())
            .unwrap();
        assert_eq!(conv.message_count, 1);
        assert_eq!(conv.decode_messages().len(), 1);
    }

    #[test]
    fn blank_payload_is_empty_list() {
        let mut conv = conversation();
        conv.messages = "   ".into();
        assert!(conv.decode_messages().is_empty());
    }
}
