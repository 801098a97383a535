//! Cardiovascular exam endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medrec_core::dto::{
    CardiovascularExamResponse, CountResponse, CreateCardiovascularExamRequest,
    UpdateCardiovascularExamRequest,
};
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::ApiError;
use crate::AppState;

use super::DateRangeQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cardiovascular-exams/patients/:pid", post(create_exam))
        .route("/api/cardiovascular-exams/patients/:pid", get(list_exams))
        .route(
            "/api/cardiovascular-exams/patients/:pid/type/:exam_type",
            get(exams_by_type),
        )
        .route(
            "/api/cardiovascular-exams/patients/:pid/abnormalities",
            get(exams_with_abnormalities),
        )
        .route("/api/cardiovascular-exams/patients/:pid/latest", get(latest_exam))
        .route(
            "/api/cardiovascular-exams/patients/:pid/date-range",
            get(exams_by_date_range),
        )
        .route("/api/cardiovascular-exams/patients/:pid/count", get(count_exams))
        .route(
            "/api/cardiovascular-exams/:id",
            put(update_exam).get(get_exam).delete(delete_exam),
        )
}

#[utoipa::path(
    post,
    path = "/api/cardiovascular-exams/patients/{pid}",
    tag = "cardiovascular-exams",
    params(("pid" = Uuid, Path,)),
    request_body = CreateCardiovascularExamRequest,
    responses((status = 201, body = CardiovascularExamResponse), (status = 404))
)]
pub(crate) async fn create_exam(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateCardiovascularExamRequest>,
) -> Result<(StatusCode, Json<CardiovascularExamResponse>), ApiError> {
    let exam = state.cardio_exams.create(pid, caller, request).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    put,
    path = "/api/cardiovascular-exams/{id}",
    tag = "cardiovascular-exams",
    params(("id" = Uuid, Path,)),
    request_body = UpdateCardiovascularExamRequest,
    responses((status = 200, body = CardiovascularExamResponse))
)]
pub(crate) async fn update_exam(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCardiovascularExamRequest>,
) -> Result<Json<CardiovascularExamResponse>, ApiError> {
    Ok(Json(state.cardio_exams.update(id, caller, request).await?))
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/{id}",
    tag = "cardiovascular-exams",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = CardiovascularExamResponse), (status = 404))
)]
pub(crate) async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardiovascularExamResponse>, ApiError> {
    Ok(Json(state.cardio_exams.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/patients/{pid}",
    tag = "cardiovascular-exams",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [CardiovascularExamResponse]))
)]
pub(crate) async fn list_exams(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<CardiovascularExamResponse>>, ApiError> {
    Ok(Json(state.cardio_exams.list_by_patient(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/patients/{pid}/type/{examType}",
    tag = "cardiovascular-exams",
    params(("pid" = Uuid, Path,), ("examType" = String, Path,)),
    responses((status = 200, body = [CardiovascularExamResponse]))
)]
pub(crate) async fn exams_by_type(
    State(state): State<AppState>,
    Path((pid, exam_type)): Path<(Uuid, String)>,
) -> Result<Json<Vec<CardiovascularExamResponse>>, ApiError> {
    Ok(Json(state.cardio_exams.list_by_type(pid, &exam_type).await?))
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/patients/{pid}/abnormalities",
    tag = "cardiovascular-exams",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = [CardiovascularExamResponse]))
)]
pub(crate) async fn exams_with_abnormalities(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<CardiovascularExamResponse>>, ApiError> {
    Ok(Json(state.cardio_exams.list_with_abnormalities(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/patients/{pid}/latest",
    tag = "cardiovascular-exams",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = CardiovascularExamResponse), (status = 404))
)]
pub(crate) async fn latest_exam(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CardiovascularExamResponse>, ApiError> {
    Ok(Json(state.cardio_exams.latest(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/patients/{pid}/date-range",
    tag = "cardiovascular-exams",
    params(
        ("pid" = Uuid, Path,),
        ("startDate" = String, Query,),
        ("endDate" = String, Query,)
    ),
    responses((status = 200, body = [CardiovascularExamResponse]))
)]
pub(crate) async fn exams_by_date_range(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<CardiovascularExamResponse>>, ApiError> {
    let (start, end) = range.instants()?;
    Ok(Json(state.cardio_exams.list_by_date_range(pid, start, end).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cardiovascular-exams/{id}",
    tag = "cardiovascular-exams",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.cardio_exams.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/cardiovascular-exams/patients/{pid}/count",
    tag = "cardiovascular-exams",
    params(("pid" = Uuid, Path,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_exams(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.cardio_exams.count(pid).await?;
    Ok(Json(CountResponse { count }))
}
