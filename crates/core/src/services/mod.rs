//! Application services, one per entity family.
//!
//! Services own validation, ownership checks, derived values and state
//! transitions; repositories stay dumb. Child-record services verify that
//! the target patient exists but do not re-check creator ownership; the
//! patient service is the sole ownership gate.

#[cfg(test)]
pub(crate) mod test_support;

mod cardiovascular_exam;
mod chat;
mod consultation;
mod medical_alert;
mod medical_analysis;
mod patient;
mod treatment;
mod vital_signs;

pub use cardiovascular_exam::CardiovascularExamService;
pub use chat::ChatConversationService;
pub use consultation::ConsultationService;
pub use medical_alert::MedicalAlertService;
pub use medical_analysis::MedicalAnalysisService;
pub use patient::PatientService;
pub use treatment::TreatmentService;
pub use vital_signs::VitalSignsService;
