//! Patient endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use medrec_core::dto::{CountResponse, CreatePatientRequest, PatientResponse, UpdatePatientRequest};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/patients", post(create_patient).get(list_patients))
        .route("/api/patients/search", get(search_patients))
        .route("/api/patients/stats/count", get(count_active_patients))
        .route("/api/patients/:id", get(get_patient))
        .route("/api/patients/:id", put(update_patient))
        .route("/api/patients/:id", delete(delete_patient))
        .route("/api/patients/:id/deactivate", patch(deactivate_patient))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, body = PatientResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Duplicate email")
    )
)]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let patient = state.patients.create(caller, request).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPatientsQuery {
    #[serde(default)]
    active_only: bool,
}

#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "patients",
    params(("activeOnly" = Option<bool>, Query, description = "Restrict to active patients")),
    responses((status = 200, body = [PatientResponse]))
)]
pub(crate) async fn list_patients(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    Ok(Json(state.patients.list(caller, query.active_only).await?))
}

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    query: String,
}

#[utoipa::path(
    get,
    path = "/api/patients/search",
    tag = "patients",
    params(("query" = String, Query, description = "Substring matched against names and email")),
    responses((status = 200, body = [PatientResponse]))
)]
pub(crate) async fn search_patients(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    Ok(Json(state.patients.search(caller, &query.query).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = Uuid, Path,)),
    responses(
        (status = 200, body = PatientResponse),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Unknown patient")
    )
)]
pub(crate) async fn get_patient(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    Ok(Json(state.patients.get(caller, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = Uuid, Path,)),
    request_body = UpdatePatientRequest,
    responses((status = 200, body = PatientResponse))
)]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    Ok(Json(state.patients.update(caller, id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    tag = "patients",
    params(("id" = Uuid, Path,)),
    responses((status = 204, description = "Deleted with all child records"))
)]
pub(crate) async fn delete_patient(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.patients.delete(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/patients/{id}/deactivate",
    tag = "patients",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = PatientResponse))
)]
pub(crate) async fn deactivate_patient(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    Ok(Json(state.patients.deactivate(caller, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/stats/count",
    tag = "patients",
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_active_patients(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.patients.count_active(caller).await?;
    Ok(Json(CountResponse { count }))
}
