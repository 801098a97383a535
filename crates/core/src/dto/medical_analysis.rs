use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::MedicalAnalysis;
use crate::time::utc_format;
use crate::validation::{optional_text, require_text};
use crate::RecordsResult;

/// `analysisType` and `status` are open sets; both are uppercased on
/// ingress by the service.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalAnalysisRequest {
    /// e.g. BLOOD_TEST, URINE_TEST, X_RAY, MRI, CT_SCAN, ECG.
    pub analysis_type: String,
    pub analysis_date: NaiveDate,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub interpretation: Option<String>,
    #[serde(default)]
    pub alerts_and_anomalies: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub performed_by: Option<String>,
    #[serde(default)]
    pub interpreted_by: Option<String>,
    /// Defaults to PENDING; lifecycle PENDING -> COMPLETED -> REVIEWED.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateMedicalAnalysisRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("analysisType", &self.analysis_type, 1, 100)?;
        optional_text("status", self.status.as_deref(), 50)?;
        optional_text("fileName", self.file_name.as_deref(), 255)?;
        optional_text("performedBy", self.performed_by.as_deref(), 200)?;
        optional_text("interpretedBy", self.interpreted_by.as_deref(), 200)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicalAnalysisRequest {
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<NaiveDate>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub interpretation: Option<String>,
    #[serde(default)]
    pub alerts_and_anomalies: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub performed_by: Option<String>,
    #[serde(default)]
    pub interpreted_by: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateMedicalAnalysisRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        if let Some(analysis_type) = &self.analysis_type {
            require_text("analysisType", analysis_type, 1, 100)?;
        }
        optional_text("status", self.status.as_deref(), 50)?;
        optional_text("fileName", self.file_name.as_deref(), 255)?;
        optional_text("performedBy", self.performed_by.as_deref(), 200)?;
        optional_text("interpretedBy", self.interpreted_by.as_deref(), 200)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalAnalysisResponse {
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
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl From<MedicalAnalysis> for MedicalAnalysisResponse {
    fn from(analysis: MedicalAnalysis) -> Self {
        Self {
            id: analysis.id,
            patient_id: analysis.patient_id,
            analysis_type: analysis.analysis_type,
            analysis_date: analysis.analysis_date,
            file_name: analysis.file_name,
            ocr_text: analysis.ocr_text,
            results: analysis.results,
            interpretation: analysis.interpretation,
            alerts_and_anomalies: analysis.alerts_and_anomalies,
            recommendations: analysis.recommendations,
            performed_by: analysis.performed_by,
            interpreted_by: analysis.interpreted_by,
            status: analysis.status,
            notes: analysis.notes,
            created_at: analysis.created_at,
            updated_at: analysis.updated_at,
            created_by: analysis.created_by,
            updated_by: analysis.updated_by,
        }
    }
}
