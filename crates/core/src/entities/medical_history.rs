use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    HistorySeverity {
        Mild => "MILD",
        Moderate => "MODERATE",
        Severe => "SEVERE",
    }
}

/// A past diagnosis in the patient's medical history. Schema-level only:
/// there is no HTTP surface for this family, but rows cascade with the
/// owning patient like every other child.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MedicalHistory {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub diagnosis_date: NaiveDate,
    pub diagnosis: String,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub severity: Option<HistorySeverity>,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
