//! HTTP surface for the patient records service.
//!
//! Thin axum handlers over the `medrec-core` services: each handler extracts
//! the caller, delegates, and maps domain errors to status codes. The router
//! is built from a store so the same surface runs over Postgres in
//! production and the in-memory store in tests and dev.

use std::sync::Arc;

use axum::middleware;
use axum::Router;
use medrec_core::repositories::{
    CardiovascularExamRepository, ChatConversationRepository, ConsultationRepository,
    MedicalAlertRepository, MedicalAnalysisRepository, PatientRepository, TreatmentRepository,
    VitalSignsRepository,
};
use medrec_core::services::{
    CardiovascularExamService, ChatConversationService, ConsultationService, MedicalAlertService,
    MedicalAnalysisService, PatientService, TreatmentService, VitalSignsService,
};
use medrec_core::Profile;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error;
pub mod openapi;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub profile: Profile,
    pub patients: PatientService,
    pub consultations: ConsultationService,
    pub treatments: TreatmentService,
    pub vital_signs: VitalSignsService,
    pub analyses: MedicalAnalysisService,
    pub cardio_exams: CardiovascularExamService,
    pub alerts: MedicalAlertService,
    pub conversations: ChatConversationService,
}

impl AppState {
    /// Wires every service onto one store implementing all repository
    /// contracts.
    pub fn from_store<S>(store: Arc<S>, profile: Profile) -> Self
    where
        S: PatientRepository
            + ConsultationRepository
            + TreatmentRepository
            + VitalSignsRepository
            + MedicalAnalysisRepository
            + CardiovascularExamRepository
            + MedicalAlertRepository
            + ChatConversationRepository
            + 'static,
    {
        let patients: Arc<dyn PatientRepository> = store.clone();
        Self {
            profile,
            patients: PatientService::new(patients.clone()),
            consultations: ConsultationService::new(store.clone(), patients.clone()),
            treatments: TreatmentService::new(store.clone(), patients.clone()),
            vital_signs: VitalSignsService::new(store.clone(), patients.clone()),
            analyses: MedicalAnalysisService::new(store.clone(), patients.clone()),
            cardio_exams: CardiovascularExamService::new(store.clone(), patients.clone()),
            alerts: MedicalAlertService::new(store.clone(), patients.clone()),
            conversations: ChatConversationService::new(store, patients),
        }
    }
}

/// Builds the full application router: API routes, health probe, OpenAPI
/// document and the caller-identification middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .merge(routes::patients::router())
        .merge(routes::consultations::router())
        .merge(routes::treatments::router())
        .merge(routes::vital_signs::router())
        .merge(routes::medical_analyses::router())
        .merge(routes::cardiovascular_exams::router())
        .merge(routes::alerts::router())
        .merge(routes::conversations::router())
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_caller))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
