//! Treatment endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medrec_core::dto::{
    CountResponse, CreateTreatmentRequest, TreatmentResponse, UpdateTreatmentRequest,
};
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::ApiError;
use crate::AppState;

use super::DateRangeQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/treatments/patients/:pid", post(create_treatment))
        .route("/api/treatments/patients/:pid", get(list_treatments))
        .route("/api/treatments/patients/:pid/active", get(list_active_treatments))
        .route(
            "/api/treatments/patients/:pid/date-range",
            get(treatments_by_date_range),
        )
        .route("/api/treatments/patients/:pid/count", get(count_treatments))
        .route(
            "/api/treatments/:id",
            put(update_treatment).get(get_treatment).delete(delete_treatment),
        )
}

#[utoipa::path(
    post,
    path = "/api/treatments/patients/{pid}",
    tag = "treatments",
    params(("pid" = Uuid, Path,)),
    request_body = CreateTreatmentRequest,
    responses((status = 201, body = TreatmentResponse), (status = 404))
)]
pub(crate) async fn create_treatment(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateTreatmentRequest>,
) -> Result<(StatusCode, Json<TreatmentResponse>), ApiError> {
    let treatment = state.treatments.create(pid, caller, request).await?;
    Ok((StatusCode::CREATED, Json(treatment)))
}

#[utoipa::path(
    put,
    path = "/api/treatments/{id}",
    tag = "treatments",
    params(("id" = Uuid, Path,)),
    request_body = UpdateTreatmentRequest,
    responses((status = 200, body = TreatmentResponse))
)]
pub(crate) async fn update_treatment(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTreatmentRequest>,
) -> Result<Json<TreatmentResponse>, ApiError> {
    Ok(Json(state.treatments.update(id, caller, request).await?))
}

#[utoipa::path(
    get,
    path = "/api/treatments/{id}",
    tag = "treatments",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = TreatmentResponse), (status = 404))
)]
pub(crate) async fn get_treatment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TreatmentResponse>, ApiError> {
    Ok(Json(state.treatments.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/treatments/patients/{pid}",
    tag = "treatments",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [TreatmentResponse]))
)]
pub(crate) async fn list_treatments(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<TreatmentResponse>>, ApiError> {
    Ok(Json(state.treatments.list_by_patient(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/treatments/patients/{pid}/active",
    tag = "treatments",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [TreatmentResponse]))
)]
pub(crate) async fn list_active_treatments(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<TreatmentResponse>>, ApiError> {
    Ok(Json(state.treatments.list_active(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/treatments/patients/{pid}/date-range",
    tag = "treatments",
    params(
        ("pid" = Uuid, Path,),
        ("startDate" = String, Query,),
        ("endDate" = String, Query,)
    ),
    responses((status = 200, body = [TreatmentResponse]))
)]
pub(crate) async fn treatments_by_date_range(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<TreatmentResponse>>, ApiError> {
    let (start, end) = range.dates()?;
    Ok(Json(state.treatments.list_by_date_range(pid, start, end).await?))
}

#[utoipa::path(
    delete,
    path = "/api/treatments/{id}",
    tag = "treatments",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_treatment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.treatments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/treatments/patients/{pid}/count",
    tag = "treatments",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_treatments(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.treatments.count(pid).await?;
    Ok(Json(CountResponse { count }))
}
