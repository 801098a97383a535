//! Medical alert endpoints, including the state-machine transitions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use medrec_core::dto::{CountResponse, CreateMedicalAlertRequest, MedicalAlertResponse};
use medrec_core::entities::AlertStatus;
use uuid::Uuid;

use crate::auth::CallerId;
use crate::error::{bad_param, ApiError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Parameter name matches the patients router; matchit rejects
        // differing names at the same position.
        .route("/api/patients/:id/alerts", post(create_alert).get(list_alerts))
        .route("/api/patients/:id/alerts/active", get(active_alerts))
        .route("/api/patients/:id/alerts/status/:status", get(alerts_by_status))
        .route("/api/patients/:id/alerts/severity/:severity", get(alerts_by_severity))
        .route("/api/patients/:id/alerts/count", get(count_active_alerts))
        .route("/api/alerts/:id", get(get_alert).delete(delete_alert))
        .route("/api/alerts/:id/resolve", put(resolve_alert))
        .route("/api/alerts/:id/dismiss", put(dismiss_alert))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/alerts",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    request_body = CreateMedicalAlertRequest,
    responses((status = 201, body = MedicalAlertResponse), (status = 404))
)]
pub(crate) async fn create_alert(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateMedicalAlertRequest>,
) -> Result<(StatusCode, Json<MedicalAlertResponse>), ApiError> {
    let alert = state.alerts.create(pid, caller, request).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/alerts",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = [MedicalAlertResponse]))
)]
pub(crate) async fn list_alerts(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<MedicalAlertResponse>>, ApiError> {
    Ok(Json(state.alerts.list_by_patient(pid).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/alerts/active",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = [MedicalAlertResponse]))
)]
pub(crate) async fn active_alerts(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<Vec<MedicalAlertResponse>>, ApiError> {
    Ok(Json(state.alerts.list_by_status(pid, AlertStatus::Active).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/alerts/status/{status}",
    tag = "alerts",
    params(("id" = Uuid, Path,), ("status" = String, Path, description = "active, resolved or dismissed")),
    responses((status = 200, body = [MedicalAlertResponse]))
)]
pub(crate) async fn alerts_by_status(
    State(state): State<AppState>,
    Path((pid, status)): Path<(Uuid, String)>,
) -> Result<Json<Vec<MedicalAlertResponse>>, ApiError> {
    let status = status.parse().map_err(|e: String| bad_param("status", e))?;
    Ok(Json(state.alerts.list_by_status(pid, status).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/alerts/severity/{severity}",
    tag = "alerts",
    params(("id" = Uuid, Path,), ("severity" = String, Path, description = "LOW, MEDIUM, HIGH or CRITICAL")),
    responses((status = 200, body = [MedicalAlertResponse]))
)]
pub(crate) async fn alerts_by_severity(
    State(state): State<AppState>,
    Path((pid, severity)): Path<(Uuid, String)>,
) -> Result<Json<Vec<MedicalAlertResponse>>, ApiError> {
    let severity = severity
        .parse()
        .map_err(|e: String| bad_param("severity", e))?;
    Ok(Json(state.alerts.list_by_severity(pid, severity).await?))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/alerts/count",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_active_alerts(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.alerts.count_active(pid).await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/alerts/{id}",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = MedicalAlertResponse), (status = 404))
)]
pub(crate) async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalAlertResponse>, ApiError> {
    Ok(Json(state.alerts.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/alerts/{id}/resolve",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses(
        (status = 200, body = MedicalAlertResponse),
        (status = 404),
        (status = 409, description = "Alert is not active")
    )
)]
pub(crate) async fn resolve_alert(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalAlertResponse>, ApiError> {
    Ok(Json(state.alerts.resolve(id, caller).await?))
}

#[utoipa::path(
    put,
    path = "/api/alerts/{id}/dismiss",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses(
        (status = 200, body = MedicalAlertResponse),
        (status = 404),
        (status = 409, description = "Alert is not active")
    )
)]
pub(crate) async fn dismiss_alert(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<MedicalAlertResponse>, ApiError> {
    Ok(Json(state.alerts.dismiss(id, caller).await?))
}

#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    tag = "alerts",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.alerts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
