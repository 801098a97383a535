use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{ChatConversation, ConversationStatus, MessageRole};
use crate::time::utc_format;
use crate::validation::{optional_text, require_text};
use crate::{RecordsError, RecordsResult};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    /// Globally unique across all conversations.
    pub session_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub tags: Option<String>,
}

impl CreateConversationRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("sessionId", &self.session_id, 1, 100)?;
        optional_text("title", self.title.as_deref(), 200)?;
        optional_text("tags", self.tags.as_deref(), 500)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    /// ACTIVE, ARCHIVED or DELETED.
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateConversationRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        optional_text("title", self.title.as_deref(), 200)?;
        optional_text("tags", self.tags.as_deref(), 500)?;
        Ok(())
    }

    pub fn status(&self) -> RecordsResult<Option<ConversationStatus>> {
        match &self.status {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|message| RecordsError::validation("status", message)),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageRequest {
    /// user, assistant or system.
    pub role: String,
    pub content: String,
}

impl AppendMessageRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        if self.content.trim().is_empty() {
            return Err(RecordsError::validation("content", "cannot be empty"));
        }
        Ok(())
    }

    pub fn role(&self) -> RecordsResult<MessageRole> {
        self.role
            .parse()
            .map_err(|message| RecordsError::validation("role", message))
    }
}

/// `messages` carries the stored JSON array string verbatim; clients decode
/// it with the `[{role, content, timestamp}]` shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatConversationResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub session_id: String,
    pub title: String,
    pub messages: String,
    pub message_count: i32,
    #[serde(with = "utc_format")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub last_message_at: DateTime<Utc>,
    pub status: ConversationStatus,
    pub tags: Option<String>,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
}

impl From<ChatConversation> for ChatConversationResponse {
    fn from(conversation: ChatConversation) -> Self {
        Self {
            id: conversation.id,
            patient_id: conversation.patient_id,
            session_id: conversation.session_id,
            title: conversation.title,
            messages: conversation.messages,
            message_count: conversation.message_count,
            started_at: conversation.started_at,
            last_message_at: conversation.last_message_at,
            status: conversation.status,
            tags: conversation.tags,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}
