//! Consultation endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medrec_core::dto::{
    ConsultationResponse, CountResponse, CreateConsultationRequest, UpdateConsultationRequest,
};
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::ApiError;
use crate::AppState;

use super::{DateRangeQuery, StatusQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/consultations/patients/:pid", post(create_consultation))
        .route("/api/consultations/patients/:pid", get(list_consultations))
        .route("/api/consultations/patients/:pid/latest", get(latest_consultation))
        .route(
            "/api/consultations/patients/:pid/date-range",
            get(consultations_by_date_range),
        )
        .route("/api/consultations/patients/:pid/count", get(count_consultations))
        .route(
            "/api/consultations/:id",
            put(update_consultation)
                .get(get_consultation)
                .delete(delete_consultation),
        )
}

#[utoipa::path(
    post,
    path = "/api/consultations/patients/{pid}",
    tag = "consultations",
    params(("pid" = Uuid, Path,)),
    request_body = CreateConsultationRequest,
    responses(
        (status = 201, body = ConsultationResponse),
        (status = 404, description = "Unknown patient")
    )
)]
pub(crate) async fn create_consultation(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<ConsultationResponse>), ApiError> {
    let consultation = state.consultations.create(pid, caller, request).await?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

#[utoipa::path(
    put,
    path = "/api/consultations/{id}",
    tag = "consultations",
    params(("id" = Uuid, Path,)),
    request_body = UpdateConsultationRequest,
    responses((status = 200, body = ConsultationResponse))
)]
pub(crate) async fn update_consultation(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateConsultationRequest>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    Ok(Json(state.consultations.update(id, caller, request).await?))
}

#[utoipa::path(
    get,
    path = "/api/consultations/{id}",
    tag = "consultations",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = ConsultationResponse), (status = 404))
)]
pub(crate) async fn get_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    Ok(Json(state.consultations.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/consultations/patients/{pid}",
    tag = "consultations",
    params(
        ("pid" = Uuid, Path,),
        ("status" = Option<String>, Query, description = "SCHEDULED, IN_PROGRESS, COMPLETED or CANCELLED")
    ),
    responses((status = 200, body = [ConsultationResponse]))
)]
pub(crate) async fn list_consultations(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<ConsultationResponse>>, ApiError> {
    let status = query.parse()?;
    Ok(Json(state.consultations.list_by_patient(pid, status).await?))
}

#[utoipa::path(
    get,
    path = "/api/consultations/patients/{pid}/latest",
    tag = "consultations",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = ConsultationResponse), (status = 404))
)]
pub(crate) async fn latest_consultation(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<ConsultationResponse>, ApiError> {
    Ok(Json(state.consultations.latest(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/consultations/patients/{pid}/date-range",
    tag = "consultations",
    params(
        ("pid" = Uuid, Path,),
        ("startDate" = String, Query,),
        ("endDate" = String, Query,)
    ),
    responses((status = 200, body = [ConsultationResponse]))
)]
pub(crate) async fn consultations_by_date_range(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<ConsultationResponse>>, ApiError> {
    let (start, end) = range.instants()?;
    Ok(Json(
        state
            .consultations
            .list_by_date_range(pid, start, end)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/consultations/{id}",
    tag = "consultations",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.consultations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/consultations/patients/{pid}/count",
    tag = "consultations",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_consultations(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.consultations.count(pid).await?;
    Ok(Json(CountResponse { count }))
}
