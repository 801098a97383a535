//! Transport shapes.
//!
//! Requests deserialize from camelCase JSON and are validated before any
//! database work; enum-valued request fields arrive as plain strings and are
//! parsed by the services so a bad value reports as a 400 naming the field.
//! Responses render instants as `yyyy-MM-dd HH:mm:ss` UTC.

mod cardiovascular_exam;
mod chat;
mod consultation;
mod medical_alert;
mod medical_analysis;
mod patient;
mod treatment;
mod vital_signs;

pub use cardiovascular_exam::{
    CardiovascularExamResponse, CreateCardiovascularExamRequest, UpdateCardiovascularExamRequest,
};
pub use chat::{
    AppendMessageRequest, ChatConversationResponse, CreateConversationRequest,
    UpdateConversationRequest,
};
pub use consultation::{ConsultationResponse, CreateConsultationRequest, UpdateConsultationRequest};
pub use medical_alert::{CreateMedicalAlertRequest, MedicalAlertResponse};
pub use medical_analysis::{
    CreateMedicalAnalysisRequest, MedicalAnalysisResponse, UpdateMedicalAnalysisRequest,
};
pub use patient::{CreatePatientRequest, PatientResponse, UpdatePatientRequest};
pub use treatment::{CreateTreatmentRequest, TreatmentResponse, UpdateTreatmentRequest};
pub use vital_signs::{CreateVitalSignsRequest, UpdateVitalSignsRequest, VitalSignsResponse};

/// Body of the count projections.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct CountResponse {
    pub count: i64,
}
