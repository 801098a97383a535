//! Medical analysis endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medrec_core::dto::{
    CountResponse, CreateMedicalAnalysisRequest, MedicalAnalysisResponse,
    UpdateMedicalAnalysisRequest,
};
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::ApiError;
use crate::AppState;

use super::DateRangeQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/medical-analyses/patients/:pid", post(create_analysis))
        .route("/api/medical-analyses/patients/:pid", get(list_analyses))
        .route("/api/medical-analyses/patients/:pid/alerts", get(analyses_with_alerts))
        .route(
            "/api/medical-analyses/patients/:pid/date-range",
            get(analyses_by_date_range),
        )
        .route("/api/medical-analyses/patients/:pid/count", get(count_analyses))
        .route(
            "/api/medical-analyses/:id",
            put(update_analysis).get(get_analysis).delete(delete_analysis),
        )
}

#[utoipa::path(
    post,
    path = "/api/medical-analyses/patients/{pid}",
    tag = "medical-analyses",
    params(("pid" = Uuid, Path,)),
    request_body = CreateMedicalAnalysisRequest,
    responses((status = 201, body = MedicalAnalysisResponse), (status = 404))
)]
pub(crate) async fn create_analysis(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateMedicalAnalysisRequest>,
) -> Result<(StatusCode, Json<MedicalAnalysisResponse>), ApiError> {
    let analysis = state.analyses.create(pid, caller, request).await?;
    Ok((StatusCode::CREATED, Json(analysis)))
}

#[utoipa::path(
    put,
    path = "/api/medical-analyses/{id}",
    tag = "medical-analyses",
    params(("id" = Uuid, Path,)),
    request_body = UpdateMedicalAnalysisRequest,
    responses((status = 200, body = MedicalAnalysisResponse))
)]
pub(crate) async fn update_analysis(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMedicalAnalysisRequest>,
) -> Result<Json<MedicalAnalysisResponse>, ApiError> {
    Ok(Json(state.analyses.update(id, caller, request).await?))
}

#[utoipa::path(
    get,
    path = "/api/medical-analyses/{id}",
    tag = "medical-analyses",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = MedicalAnalysisResponse), (status = 404))
)]
pub(crate) async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalAnalysisResponse>, ApiError> {
    Ok(Json(state.analyses.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/medical-analyses/patients/{pid}",
    tag = "medical-analyses",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [MedicalAnalysisResponse]))
)]
pub(crate) async fn list_analyses(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<MedicalAnalysisResponse>>, ApiError> {
    Ok(Json(state.analyses.list_by_patient(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/medical-analyses/patients/{pid}/alerts",
    tag = "medical-analyses",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [MedicalAnalysisResponse]))
)]
pub(crate) async fn analyses_with_alerts(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<MedicalAnalysisResponse>>, ApiError> {
    Ok(Json(state.analyses.list_with_alerts(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/medical-analyses/patients/{pid}/date-range",
    tag = "medical-analyses",
    params(
        ("pid" = Uuid, Path,),
        ("startDate" = String, Query,),
        ("endDate" = String, Query,)
    ),
    responses((status = 200, body = [MedicalAnalysisResponse]))
)]
pub(crate) async fn analyses_by_date_range(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<MedicalAnalysisResponse>>, ApiError> {
    let (start, end) = range.dates()?;
    Ok(Json(state.analyses.list_by_date_range(pid, start, end).await?))
}

#[utoipa::path(
    delete,
    path = "/api/medical-analyses/{id}",
    tag = "medical-analyses",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.analyses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/medical-analyses/patients/{pid}/count",
    tag = "medical-analyses",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_analyses(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.analyses.count(pid).await?;
    Ok(Json(CountResponse { count }))
}
