use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A lab or imaging analysis record.
///
/// `analysis_type` and `status` are open sets (BLOOD_TEST, URINE_TEST,
/// X_RAY, MRI, CT_SCAN, ECG, ...; PENDING -> COMPLETED -> REVIEWED) and are
/// uppercased on ingress. `recommendations` and `alerts_and_anomalies` are
/// free text and are never interpreted by the service.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MedicalAnalysis {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub analysis_type: String,
    pub analysis_date: NaiveDate,
    pub file_name: Option<String>,
    pub ocr_text: Option<String>,
    pub results: Option<String>,
    pub interpretation: Option<String>,
    pub alerts_and_anomalies: Option<String>,
    pub recommendations: Option<String>,
    pub performed_by: Option<String>,
    pub interpreted_by: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}
