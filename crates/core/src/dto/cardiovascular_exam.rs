use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::CardiovascularExam;
use crate::time::{utc_format, utc_format_opt};
use crate::validation::{optional_text, require_text};
use crate::RecordsResult;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardiovascularExamRequest {
    /// e.g. ECG, ECHOCARDIOGRAPHY, STRESS_TEST.
    pub exam_type: String,
    #[serde(with = "utc_format")]
    pub exam_date: DateTime<Utc>,
    pub results: String,
    #[serde(default)]
    pub interpretation: Option<String>,
    #[serde(default)]
    pub measured_values: Option<String>,
    #[serde(default)]
    pub abnormalities: Option<String>,
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to COMPLETED.
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateCardiovascularExamRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("examType", &self.exam_type, 2, 100)?;
        require_text("results", &self.results, 3, 2000)?;
        optional_text("interpretation", self.interpretation.as_deref(), 2000)?;
        optional_text("measuredValues", self.measured_values.as_deref(), 1000)?;
        optional_text("abnormalities", self.abnormalities.as_deref(), 1000)?;
        optional_text("pdfFile", self.pdf_file.as_deref(), 255)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        optional_text("status", self.status.as_deref(), 50)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardiovascularExamRequest {
    #[serde(default)]
    pub exam_type: Option<String>,
    #[serde(default, with = "utc_format_opt")]
    pub exam_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub interpretation: Option<String>,
    #[serde(default)]
    pub measured_values: Option<String>,
    #[serde(default)]
    pub abnormalities: Option<String>,
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateCardiovascularExamRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        if let Some(exam_type) = &self.exam_type {
            require_text("examType", exam_type, 2, 100)?;
        }
        if let Some(results) = &self.results {
            require_text("results", results, 3, 2000)?;
        }
        optional_text("interpretation", self.interpretation.as_deref(), 2000)?;
        optional_text("measuredValues", self.measured_values.as_deref(), 1000)?;
        optional_text("abnormalities", self.abnormalities.as_deref(), 1000)?;
        optional_text("pdfFile", self.pdf_file.as_deref(), 255)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        optional_text("status", self.status.as_deref(), 50)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardiovascularExamResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub exam_type: String,
    #[serde(with = "utc_format")]
    pub exam_date: DateTime<Utc>,
    pub results: String,
    pub interpretation: Option<String>,
    pub measured_values: Option<String>,
    pub abnormalities: Option<String>,
    pub pdf_file: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl From<CardiovascularExam> for CardiovascularExamResponse {
    fn from(exam: CardiovascularExam) -> Self {
        Self {
            id: exam.id,
            patient_id: exam.patient_id,
            exam_type: exam.exam_type,
            exam_date: exam.exam_date,
            results: exam.results,
            interpretation: exam.interpretation,
            measured_values: exam.measured_values,
            abnormalities: exam.abnormalities,
            pdf_file: exam.pdf_file,
            notes: exam.notes,
            status: exam.status,
            created_at: exam.created_at,
            updated_at: exam.updated_at,
            created_by: exam.created_by,
            updated_by: exam.updated_by,
        }
    }
}
