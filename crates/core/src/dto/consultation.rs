use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{Consultation, ConsultationStatus};
use crate::time::{utc_format, utc_format_opt};
use crate::validation::{optional_text, require_text};
use crate::{RecordsError, RecordsResult};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultationRequest {
    #[serde(with = "utc_format")]
    pub consultation_date: DateTime<Utc>,
    pub reason_for_visit: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub physical_examination: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub prescriptions: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub vital_signs: Option<String>,
    #[serde(default)]
    pub follow_up_instructions: Option<String>,
    #[serde(default, with = "utc_format_opt")]
    pub next_appointment: Option<DateTime<Utc>>,
    /// SCHEDULED, IN_PROGRESS, COMPLETED or CANCELLED; defaults to COMPLETED.
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateConsultationRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("reasonForVisit", &self.reason_for_visit, 3, 200)?;
        optional_text("symptoms", self.symptoms.as_deref(), 1000)?;
        optional_text("physicalExamination", self.physical_examination.as_deref(), 2000)?;
        optional_text("diagnosis", self.diagnosis.as_deref(), 1000)?;
        optional_text("treatment", self.treatment.as_deref(), 2000)?;
        optional_text("prescriptions", self.prescriptions.as_deref(), 2000)?;
        optional_text("notes", self.notes.as_deref(), 2000)?;
        optional_text("vitalSigns", self.vital_signs.as_deref(), 500)?;
        optional_text("followUpInstructions", self.follow_up_instructions.as_deref(), 1000)?;
        Ok(())
    }

    pub fn status(&self) -> RecordsResult<ConsultationStatus> {
        parse_status(self.status.as_deref()).map(|s| s.unwrap_or(ConsultationStatus::Completed))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultationRequest {
    #[serde(default, with = "utc_format_opt")]
    pub consultation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason_for_visit: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub physical_examination: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub prescriptions: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub vital_signs: Option<String>,
    #[serde(default)]
    pub follow_up_instructions: Option<String>,
    #[serde(default, with = "utc_format_opt")]
    pub next_appointment: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateConsultationRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        if let Some(reason) = &self.reason_for_visit {
            require_text("reasonForVisit", reason, 3, 200)?;
        }
        optional_text("symptoms", self.symptoms.as_deref(), 1000)?;
        optional_text("physicalExamination", self.physical_examination.as_deref(), 2000)?;
        optional_text("diagnosis", self.diagnosis.as_deref(), 1000)?;
        optional_text("treatment", self.treatment.as_deref(), 2000)?;
        optional_text("prescriptions", self.prescriptions.as_deref(), 2000)?;
        optional_text("notes", self.notes.as_deref(), 2000)?;
        optional_text("vitalSigns", self.vital_signs.as_deref(), 500)?;
        optional_text("followUpInstructions", self.follow_up_instructions.as_deref(), 1000)?;
        Ok(())
    }

    pub fn status(&self) -> RecordsResult<Option<ConsultationStatus>> {
        parse_status(self.status.as_deref())
    }
}

fn parse_status(raw: Option<&str>) -> RecordsResult<Option<ConsultationStatus>> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|message| RecordsError::validation("status", message)),
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(with = "utc_format")]
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
    #[serde(with = "utc_format_opt")]
    pub next_appointment: Option<DateTime<Utc>>,
    pub status: ConsultationStatus,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl From<Consultation> for ConsultationResponse {
    fn from(consultation: Consultation) -> Self {
        Self {
            id: consultation.id,
            patient_id: consultation.patient_id,
            consultation_date: consultation.consultation_date,
            reason_for_visit: consultation.reason_for_visit,
            symptoms: consultation.symptoms,
            physical_examination: consultation.physical_examination,
            diagnosis: consultation.diagnosis,
            treatment: consultation.treatment,
            prescriptions: consultation.prescriptions,
            notes: consultation.notes,
            vital_signs: consultation.vital_signs,
            follow_up_instructions: consultation.follow_up_instructions,
            next_appointment: consultation.next_appointment,
            status: consultation.status,
            created_at: consultation.created_at,
            updated_at: consultation.updated_at,
            created_by: consultation.created_by,
            updated_by: consultation.updated_by,
        }
    }
}
