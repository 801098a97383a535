//! Chat conversation service: creation, the append protocol and queries.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::{
    AppendMessageRequest, ChatConversationResponse, CreateConversationRequest,
    UpdateConversationRequest,
};
use crate::entities::{ChatConversation, ConversationStatus, DEFAULT_TITLE};
use crate::repositories::{ChatConversationRepository, PatientRepository};
use crate::{RecordsError, RecordsResult};

#[derive(Clone)]
pub struct ChatConversationService {
    conversations: Arc<dyn ChatConversationRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl ChatConversationService {
    pub fn new(
        conversations: Arc<dyn ChatConversationRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self {
            conversations,
            patients,
        }
    }

    /// Creates an empty active conversation. The session identifier is
    /// globally unique; a duplicate is a conflict.
    pub async fn create(
        &self,
        patient_id: Uuid,
        request: CreateConversationRequest,
    ) -> RecordsResult<ChatConversationResponse> {
        request.validate()?;
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        let session_id = request.session_id.trim().to_string();
        // Pre-check for a friendly conflict; the unique index still backstops
        // a concurrent insert racing past this read.
        if self.conversations.session_exists(&session_id).await? {
            return Err(RecordsError::conflict(format!(
                "session '{session_id}' already has a conversation"
            )));
        }
        let now = Utc::now();

        let conversation = ChatConversation {
            id: Uuid::new_v4(),
            patient_id,
            session_id,
            title: request
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            messages: "[]".to_string(),
            message_count: 0,
            started_at: now,
            last_message_at: now,
            status: ConversationStatus::Active,
            tags: request.tags,
            created_at: now,
            updated_at: now,
        };

        let conversation = self.conversations.insert(conversation).await?;
        tracing::info!(
            conversation_id = %conversation.id,
            %patient_id,
            "chat conversation started"
        );
        Ok(conversation.into())
    }

    /// Appends `{role, content, timestamp: now}` to the stored payload.
    /// Runs under the repository's row lock so concurrent appends to the
    /// same conversation serialize.
    pub async fn append_message(
        &self,
        id: Uuid,
        request: AppendMessageRequest,
    ) -> RecordsResult<ChatConversationResponse> {
        request.validate()?;
        let role = request.role()?;
        self.conversations
            .append_message(id, role, request.content.trim(), Utc::now())
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("conversation"))
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<ChatConversationResponse> {
        self.conversations
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("conversation"))
    }

    pub async fn get_by_session(&self, session_id: &str) -> RecordsResult<ChatConversationResponse> {
        self.conversations
            .find_by_session(session_id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("conversation"))
    }

    /// Partial update of title, tags and status.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateConversationRequest,
    ) -> RecordsResult<ChatConversationResponse> {
        request.validate()?;
        let status = request.status()?;
        let mut conversation = self
            .conversations
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("conversation"))?;

        if let Some(title) = request.title {
            conversation.title = title;
        }
        if request.tags.is_some() {
            conversation.tags = request.tags;
        }
        if let Some(status) = status {
            conversation.status = status;
        }
        conversation.updated_at = Utc::now();

        self.conversations.update(conversation).await.map(Into::into)
    }

    pub async fn archive(&self, id: Uuid) -> RecordsResult<ChatConversationResponse> {
        let mut conversation = self
            .conversations
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("conversation"))?;
        conversation.status = ConversationStatus::Archived;
        conversation.updated_at = Utc::now();
        self.conversations.update(conversation).await.map(Into::into)
    }

    pub async fn list_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<Vec<ChatConversationResponse>> {
        let rows = self.conversations.list_by_patient(patient_id, status).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<i64> {
        self.conversations.count_by_patient(patient_id, status).await
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.conversations.delete(id).await? {
            return Err(RecordsError::NotFound("conversation"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (ChatConversationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = ChatConversationService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request(session: &str) -> CreateConversationRequest {
        CreateConversationRequest {
            session_id: session.into(),
            title: None,
            tags: None,
        }
    }

    #[tokio::test]
    async fn duplicate_session_conflicts() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        service.create(patient_id, request("s-1")).await.unwrap();
        assert!(matches!(
            service.create(patient_id, request("s-1")).await,
            Err(RecordsError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn append_keeps_count_and_derives_title() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service.create(patient_id, request("s-1")).await.unwrap();
        assert_eq!(created.title, DEFAULT_TITLE);

        let appended = service
            .append_message(
                created.id,
                AppendMessageRequest {
                    role: "user".into(),
                    content: "Bonjour docteur".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(appended.message_count, 1);
        assert_eq!(appended.title, "Bonjour docteur");
    }

    #[tokio::test]
    async fn append_rejects_blank_content_and_bad_roles() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service.create(patient_id, request("s-1")).await.unwrap();

        assert!(matches!(
            service
                .append_message(
                    created.id,
                    AppendMessageRequest {
                        role: "user".into(),
                        content: "   ".into(),
                    },
                )
                .await,
            Err(RecordsError::Validation { field: "content", .. })
        ));
        assert!(matches!(
            service
                .append_message(
                    created.id,
                    AppendMessageRequest {
                        role: "narrator".into(),
                        content: "hello".into(),
                    },
                )
                .await,
            Err(RecordsError::Validation { field: "role", .. })
        ));
    }

    #[tokio::test]
    async fn append_to_unknown_conversation_is_not_found() {
        let (service, _) = setup();
        assert!(matches!(
            service
                .append_message(
                    Uuid::new_v4(),
                    AppendMessageRequest {
                        role: "user".into(),
                        content: "hello".into(),
                    },
                )
                .await,
            Err(RecordsError::NotFound("conversation"))
        ));
    }

    #[tokio::test]
    async fn archive_and_status_filter() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let a = service.create(patient_id, request("s-1")).await.unwrap();
        service.create(patient_id, request("s-2")).await.unwrap();

        service.archive(a.id).await.unwrap();
        let archived = service
            .list_by_patient(patient_id, Some(ConversationStatus::Archived))
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, a.id);
        assert_eq!(
            service
                .count_by_patient(patient_id, Some(ConversationStatus::Active))
                .await
                .unwrap(),
            1
        );
    }
}
