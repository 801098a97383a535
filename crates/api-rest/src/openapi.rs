//! OpenAPI document served at `/api-docs/openapi.json` and browsed through
//! the Swagger UI.

use medrec_core::dto::{
    AppendMessageRequest, CardiovascularExamResponse, ChatConversationResponse,
    ConsultationResponse, CountResponse, CreateCardiovascularExamRequest,
    CreateConsultationRequest, CreateConversationRequest, CreateMedicalAlertRequest,
    CreateMedicalAnalysisRequest, CreatePatientRequest, CreateTreatmentRequest,
    CreateVitalSignsRequest, MedicalAlertResponse, MedicalAnalysisResponse, PatientResponse,
    TreatmentResponse, UpdateCardiovascularExamRequest, UpdateConsultationRequest,
    UpdateConversationRequest, UpdateMedicalAnalysisRequest, UpdatePatientRequest,
    UpdateTreatmentRequest, UpdateVitalSignsRequest, VitalSignsResponse,
};
use medrec_core::entities::{
    AlertSeverity, AlertStatus, ConsultationStatus, ConversationStatus, Gender, MessageRole,
    TreatmentStatus,
};
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patient Records API",
        description = "Patient records: consultations, treatments, vital signs, \
                       analyses, cardiovascular exams, alerts and chat conversations."
    ),
    paths(
        routes::health::health,
        routes::patients::create_patient,
        routes::patients::list_patients,
        routes::patients::search_patients,
        routes::patients::get_patient,
        routes::patients::update_patient,
        routes::patients::delete_patient,
        routes::patients::deactivate_patient,
        routes::patients::count_active_patients,
        routes::consultations::create_consultation,
        routes::consultations::update_consultation,
        routes::consultations::get_consultation,
        routes::consultations::list_consultations,
        routes::consultations::latest_consultation,
        routes::consultations::consultations_by_date_range,
        routes::consultations::delete_consultation,
        routes::consultations::count_consultations,
        routes::treatments::create_treatment,
        routes::treatments::update_treatment,
        routes::treatments::get_treatment,
        routes::treatments::list_treatments,
        routes::treatments::list_active_treatments,
        routes::treatments::treatments_by_date_range,
        routes::treatments::delete_treatment,
        routes::treatments::count_treatments,
        routes::vital_signs::create_vital_signs,
        routes::vital_signs::update_vital_signs,
        routes::vital_signs::get_vital_signs,
        routes::vital_signs::list_vital_signs,
        routes::vital_signs::latest_vital_signs,
        routes::vital_signs::vital_signs_by_date_range,
        routes::vital_signs::delete_vital_signs,
        routes::vital_signs::count_vital_signs,
        routes::medical_analyses::create_analysis,
        routes::medical_analyses::update_analysis,
        routes::medical_analyses::get_analysis,
        routes::medical_analyses::list_analyses,
        routes::medical_analyses::analyses_with_alerts,
        routes::medical_analyses::analyses_by_date_range,
        routes::medical_analyses::delete_analysis,
        routes::medical_analyses::count_analyses,
        routes::cardiovascular_exams::create_exam,
        routes::cardiovascular_exams::update_exam,
        routes::cardiovascular_exams::get_exam,
        routes::cardiovascular_exams::list_exams,
        routes::cardiovascular_exams::exams_by_type,
        routes::cardiovascular_exams::exams_with_abnormalities,
        routes::cardiovascular_exams::latest_exam,
        routes::cardiovascular_exams::exams_by_date_range,
        routes::cardiovascular_exams::delete_exam,
        routes::cardiovascular_exams::count_exams,
        routes::alerts::create_alert,
        routes::alerts::list_alerts,
        routes::alerts::active_alerts,
        routes::alerts::alerts_by_status,
        routes::alerts::alerts_by_severity,
        routes::alerts::count_active_alerts,
        routes::alerts::get_alert,
        routes::alerts::resolve_alert,
        routes::alerts::dismiss_alert,
        routes::alerts::delete_alert,
        routes::conversations::create_conversation,
        routes::conversations::list_conversations,
        routes::conversations::count_conversations,
        routes::conversations::get_conversation,
        routes::conversations::get_by_session,
        routes::conversations::update_conversation,
        routes::conversations::append_message,
        routes::conversations::archive_conversation,
        routes::conversations::delete_conversation,
    ),
    components(schemas(
        CountResponse,
        Gender,
        CreatePatientRequest,
        UpdatePatientRequest,
        PatientResponse,
        ConsultationStatus,
        CreateConsultationRequest,
        UpdateConsultationRequest,
        ConsultationResponse,
        TreatmentStatus,
        CreateTreatmentRequest,
        UpdateTreatmentRequest,
        TreatmentResponse,
        CreateVitalSignsRequest,
        UpdateVitalSignsRequest,
        VitalSignsResponse,
        CreateMedicalAnalysisRequest,
        UpdateMedicalAnalysisRequest,
        MedicalAnalysisResponse,
        CreateCardiovascularExamRequest,
        UpdateCardiovascularExamRequest,
        CardiovascularExamResponse,
        AlertSeverity,
        AlertStatus,
        CreateMedicalAlertRequest,
        MedicalAlertResponse,
        ConversationStatus,
        MessageRole,
        CreateConversationRequest,
        UpdateConversationRequest,
        AppendMessageRequest,
        ChatConversationResponse,
    )),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "patients", description = "Patient registry"),
        (name = "consultations", description = "Consultation history"),
        (name = "treatments", description = "Prescribed treatments"),
        (name = "vital-signs", description = "Vital-sign measurements"),
        (name = "medical-analyses", description = "Laboratory analyses"),
        (name = "cardiovascular-exams", description = "Cardiovascular exams"),
        (name = "alerts", description = "Medical alerts"),
        (name = "conversations", description = "Patient chat conversations"),
    )
)]
pub struct ApiDoc;
