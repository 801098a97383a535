use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    ConsultationStatus {
        Scheduled => "SCHEDULED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

/// A clinical consultation attached to a patient.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Consultation {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub consultation_date: DateTime<Utc>,
    pub reason_for_visit: String,
    pub symptoms: Option<String>,
    pub physical_examination: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub prescriptions: Option<String>,
    pub notes: Option<String>,
    pub vital_signs: Option<String>,
    pub follow_up_instructions: Option<String>,
    pub next_appointment: Option<DateTime<Utc>>,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}
