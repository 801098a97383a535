//! Persistence contracts.
//!
//! Per-entity repositories behind `async_trait` seams so services can be
//! exercised against the in-memory store while production runs on Postgres.
//! Implementations guarantee deterministic ordering: the family's natural
//! timestamp descending, ties broken by identifier ascending.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::{
    AlertSeverity, AlertStatus, CardiovascularExam, ChatConversation, Consultation,
    ConsultationStatus, ConversationStatus, MedicalAlert, MedicalAnalysis, MedicalHistory,
    MessageRole, Patient, Treatment, VitalSigns,
};
use crate::RecordsResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn insert(&self, patient: Patient) -> RecordsResult<Patient>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<Patient>>;
    async fn exists(&self, id: Uuid) -> RecordsResult<bool>;
    async fn update(&self, patient: Patient) -> RecordsResult<Patient>;
    /// Hard delete. Cascades to every owned child row; returns whether the
    /// patient existed.
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_creator(
        &self,
        created_by: Uuid,
        active_only: bool,
    ) -> RecordsResult<Vec<Patient>>;
    /// Case-insensitive substring match on first name, last name or email,
    /// restricted to the creator's patients.
    async fn search(&self, created_by: Uuid, query: &str) -> RecordsResult<Vec<Patient>>;
    async fn count_active(&self, created_by: Uuid) -> RecordsResult<i64>;
}

#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    async fn insert(&self, consultation: Consultation) -> RecordsResult<Consultation>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<Consultation>>;
    async fn update(&self, consultation: Consultation) -> RecordsResult<Consultation>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<Consultation>>;
    async fn list_by_patient_and_status(
        &self,
        patient_id: Uuid,
        status: ConsultationStatus,
    ) -> RecordsResult<Vec<Consultation>>;
    async fn latest_for_patient(&self, patient_id: Uuid) -> RecordsResult<Option<Consultation>>;
    /// Inclusive on both ends.
    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<Consultation>>;
    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64>;
}

#[async_trait]
pub trait TreatmentRepository: Send + Sync {
    async fn insert(&self, treatment: Treatment) -> RecordsResult<Treatment>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<Treatment>>;
    async fn update(&self, treatment: Treatment) -> RecordsResult<Treatment>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<Treatment>>;
    async fn list_active(&self, patient_id: Uuid) -> RecordsResult<Vec<Treatment>>;
    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<Treatment>>;
    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64>;
}

#[async_trait]
pub trait VitalSignsRepository: Send + Sync {
    async fn insert(&self, vitals: VitalSigns) -> RecordsResult<VitalSigns>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<VitalSigns>>;
    async fn update(&self, vitals: VitalSigns) -> RecordsResult<VitalSigns>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<VitalSigns>>;
    async fn latest_for_patient(&self, patient_id: Uuid) -> RecordsResult<Option<VitalSigns>>;
    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<VitalSigns>>;
    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64>;
}

#[async_trait]
pub trait MedicalAnalysisRepository: Send + Sync {
    async fn insert(&self, analysis: MedicalAnalysis) -> RecordsResult<MedicalAnalysis>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalAnalysis>>;
    async fn update(&self, analysis: MedicalAnalysis) -> RecordsResult<MedicalAnalysis>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAnalysis>>;
    /// Rows whose alerts/anomalies text is present and non-empty.
    async fn list_with_alerts(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAnalysis>>;
    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<MedicalAnalysis>>;
    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64>;
}

#[async_trait]
pub trait CardiovascularExamRepository: Send + Sync {
    async fn insert(&self, exam: CardiovascularExam) -> RecordsResult<CardiovascularExam>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<CardiovascularExam>>;
    async fn update(&self, exam: CardiovascularExam) -> RecordsResult<CardiovascularExam>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<CardiovascularExam>>;
    async fn list_by_type(
        &self,
        patient_id: Uuid,
        exam_type: &str,
    ) -> RecordsResult<Vec<CardiovascularExam>>;
    /// Rows whose abnormalities text is present and non-empty.
    async fn list_with_abnormalities(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<CardiovascularExam>>;
    async fn latest_for_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Option<CardiovascularExam>>;
    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<CardiovascularExam>>;
    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64>;
}

#[async_trait]
pub trait MedicalAlertRepository: Send + Sync {
    async fn insert(&self, alert: MedicalAlert) -> RecordsResult<MedicalAlert>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalAlert>>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAlert>>;
    async fn list_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<Vec<MedicalAlert>>;
    async fn list_by_severity(
        &self,
        patient_id: Uuid,
        severity: AlertSeverity,
    ) -> RecordsResult<Vec<MedicalAlert>>;
    async fn count_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<i64>;
    /// Conditional `active -> resolved` transition, serialized against
    /// concurrent resolvers. `Ok(None)` when the alert does not exist;
    /// conflict when it is not active.
    async fn mark_resolved(
        &self,
        id: Uuid,
        resolved_by: Uuid,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<MedicalAlert>>;
    /// Conditional `active -> dismissed` transition; no resolution date.
    async fn mark_dismissed(
        &self,
        id: Uuid,
        dismissed_by: Uuid,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<MedicalAlert>>;
}

#[async_trait]
pub trait ChatConversationRepository: Send + Sync {
    async fn insert(&self, conversation: ChatConversation) -> RecordsResult<ChatConversation>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<ChatConversation>>;
    async fn find_by_session(&self, session_id: &str) -> RecordsResult<Option<ChatConversation>>;
    async fn session_exists(&self, session_id: &str) -> RecordsResult<bool>;
    async fn update(&self, conversation: ChatConversation) -> RecordsResult<ChatConversation>;
    /// Run the append protocol under a row lock so concurrent appends to
    /// the same conversation serialize. `Ok(None)` when absent.
    async fn append_message(
        &self,
        id: Uuid,
        role: MessageRole,
        content: &str,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<ChatConversation>>;
    async fn delete(&self, id: Uuid) -> RecordsResult<bool>;
    /// Ordered by `last_message_at` descending.
    async fn list_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<Vec<ChatConversation>>;
    async fn count_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<i64>;
}

#[async_trait]
pub trait MedicalHistoryRepository: Send + Sync {
    async fn insert(&self, history: MedicalHistory) -> RecordsResult<MedicalHistory>;
    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalHistory>>;
    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalHistory>>;
    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64>;
}
