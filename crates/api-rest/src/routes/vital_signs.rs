//! Vital-signs endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medrec_core::dto::{
    CountResponse, CreateVitalSignsRequest, UpdateVitalSignsRequest, VitalSignsResponse,
};
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::ApiError;
use crate::AppState;

use super::DateRangeQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/vital-signs/patients/:pid", post(create_vital_signs))
        .route("/api/vital-signs/patients/:pid", get(list_vital_signs))
        .route("/api/vital-signs/patients/:pid/latest", get(latest_vital_signs))
        .route(
            "/api/vital-signs/patients/:pid/date-range",
            get(vital_signs_by_date_range),
        )
        .route("/api/vital-signs/patients/:pid/count", get(count_vital_signs))
        .route(
            "/api/vital-signs/:id",
            put(update_vital_signs).get(get_vital_signs).delete(delete_vital_signs),
        )
}

#[utoipa::path(
    post,
    path = "/api/vital-signs/patients/{pid}",
    tag = "vital-signs",
    params(("pid" = Uuid, Path,)),
    request_body = CreateVitalSignsRequest,
    responses((status = 201, body = VitalSignsResponse), (status = 404))
)]
pub(crate) async fn create_vital_signs(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateVitalSignsRequest>,
) -> Result<(StatusCode, Json<VitalSignsResponse>), ApiError> {
    let vitals = state.vital_signs.create(pid, caller, request).await?;
    Ok((StatusCode::CREATED, Json(vitals)))
}

#[utoipa::path(
    put,
    path = "/api/vital-signs/{id}",
    tag = "vital-signs",
    params(("id" = Uuid, Path,)),
    request_body = UpdateVitalSignsRequest,
    responses((status = 200, body = VitalSignsResponse))
)]
pub(crate) async fn update_vital_signs(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVitalSignsRequest>,
) -> Result<Json<VitalSignsResponse>, ApiError> {
    Ok(Json(state.vital_signs.update(id, caller, request).await?))
}

#[utoipa::path(
    get,
    path = "/api/vital-signs/{id}",
    tag = "vital-signs",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = VitalSignsResponse), (status = 404))
)]
pub(crate) async fn get_vital_signs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VitalSignsResponse>, ApiError> {
    Ok(Json(state.vital_signs.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/vital-signs/patients/{pid}",
    tag = "vital-signs",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [VitalSignsResponse]))
)]
pub(crate) async fn list_vital_signs(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<VitalSignsResponse>>, ApiError> {
    Ok(Json(state.vital_signs.list_by_patient(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/vital-signs/patients/{pid}/latest",
    tag = "vital-signs",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = VitalSignsResponse), (status = 404))
)]
pub(crate) async fn latest_vital_signs(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<VitalSignsResponse>, ApiError> {
    Ok(Json(state.vital_signs.latest(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/vital-signs/patients/{pid}/date-range",
    tag = "vital-signs",
    params(
        ("pid" = Uuid, Path,),
        ("startDate" = String, Query,),
        ("endDate" = String, Query,)
    ),
    responses((status = 200, body = [VitalSignsResponse]))
)]
pub(crate) async fn vital_signs_by_date_range(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<VitalSignsResponse>>, ApiError> {
    let (start, end) = range.instants()?;
    Ok(Json(state.vital_signs.list_by_date_range(pid, start, end).await?))
}

#[utoipa::path(
    delete,
    path = "/api/vital-signs/{id}",
    tag = "vital-signs",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_vital_signs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.vital_signs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/vital-signs/patients/{pid}/count",
    tag = "vital-signs",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_vital_signs(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.vital_signs.count(pid).await?;
    Ok(Json(CountResponse { count }))
}
