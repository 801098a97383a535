use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    TreatmentStatus {
        Active => "ACTIVE",
        Completed => "COMPLETED",
        Discontinued => "DISCONTINUED",
        Paused => "PAUSED",
    }
}

/// A medication prescription. When both dates are set, `end_date` is never
/// before `start_date`.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Treatment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    pub route_of_administration: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub duration_days: Option<i32>,
    pub status: TreatmentStatus,
    pub indication: Option<String>,
    pub side_effects: Option<String>,
    pub prescriber_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}
