use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A cardiovascular examination (ECG, echocardiography, stress test, ...).
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct CardiovascularExam {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub exam_type: String,
    pub exam_date: DateTime<Utc>,
    pub results: String,
    pub interpretation: Option<String>,
    pub measured_values: Option<String>,
    pub abnormalities: Option<String>,
    pub pdf_file: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}
