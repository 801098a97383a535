//! Chat conversation endpoints, including the message append protocol.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use medrec_core::dto::{
    AppendMessageRequest, ChatConversationResponse, CountResponse, CreateConversationRequest,
    UpdateConversationRequest,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

use super::StatusQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/conversations/patients/:pid",
            post(create_conversation).get(list_conversations),
        )
        .route("/api/conversations/patients/:pid/count", get(count_conversations))
        .route("/api/conversations/session/:session_id", get(get_by_session))
        .route(
            "/api/conversations/:id",
            get(get_conversation)
                .put(update_conversation)
                .delete(delete_conversation),
        )
        .route("/api/conversations/:id/messages", post(append_message))
        .route("/api/conversations/:id/archive", patch(archive_conversation))
}

#[utoipa::path(
    post,
    path = "/api/conversations/patients/{pid}",
    tag = "conversations",
    params(("pid" = Uuid, Path,)),
    request_body = CreateConversationRequest,
    responses(
        (status = 201, body = ChatConversationResponse),
        (status = 404),
        (status = 409, description = "Session identifier already in use")
    )
)]
pub(crate) async fn create_conversation(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ChatConversationResponse>), ApiError> {
    let conversation = state.conversations.create(pid, request).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

#[utoipa::path(
    get,
    path = "/api/conversations/patients/{pid}",
    tag = "conversations",
    params(("pid" = Uuid, Path,), ("status" = Option<String>, Query,)),
    responses((status = 200, body = [ChatConversationResponse]))
)]
pub(crate) async fn list_conversations(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(filter): Query<StatusQuery>,
) -> Result<Json<Vec<ChatConversationResponse>>, ApiError> {
    let status = filter.parse()?;
    Ok(Json(state.conversations.list_by_patient(pid, status).await?))
}

#[utoipa::path(
    get,
    path = "/api/conversations/patients/{pid}/count",
    tag = "conversations",
    params(("pid" = Uuid, Path,), ("status" = Option<String>, Query,)),
    responses((status = 200, body = CountResponse))
)]
pub(crate) async fn count_conversations(
    State(state): State<AppState>,
    Path(pid): Path<Uuid>,
    Query(filter): Query<StatusQuery>,
) -> Result<Json<CountResponse>, ApiError> {
    let status = filter.parse()?;
    let count = state.conversations.count_by_patient(pid, status).await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}",
    tag = "conversations",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = ChatConversationResponse), (status = 404))
)]
pub(crate) async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatConversationResponse>, ApiError> {
    Ok(Json(state.conversations.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/conversations/session/{sessionId}",
    tag = "conversations",
    params(("sessionId" = String, Path,)),
    responses((status = 200, body = ChatConversationResponse), (status = 404))
)]
pub(crate) async fn get_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ChatConversationResponse>, ApiError> {
    Ok(Json(state.conversations.get_by_session(&session_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/conversations/{id}",
    tag = "conversations",
    params(("id" = Uuid, Path,)),
    request_body = UpdateConversationRequest,
    responses((status = 200, body = ChatConversationResponse), (status = 404))
)]
pub(crate) async fn update_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateConversationRequest>,
) -> Result<Json<ChatConversationResponse>, ApiError> {
    Ok(Json(state.conversations.update(id, request).await?))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    tag = "conversations",
    params(("id" = Uuid, Path,)),
    request_body = AppendMessageRequest,
    responses((status = 200, body = ChatConversationResponse), (status = 404))
)]
pub(crate) async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AppendMessageRequest>,
) -> Result<Json<ChatConversationResponse>, ApiError> {
    Ok(Json(state.conversations.append_message(id, request).await?))
}

#[utoipa::path(
    patch,
    path = "/api/conversations/{id}/archive",
    tag = "conversations",
    params(("id" = Uuid, Path,)),
    responses((status = 200, body = ChatConversationResponse), (status = 404))
)]
pub(crate) async fn archive_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatConversationResponse>, ApiError> {
    Ok(Json(state.conversations.archive(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/conversations/{id}",
    tag = "conversations",
    params(("id" = Uuid, Path,)),
    responses((status = 204), (status = 404))
)]
pub(crate) async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.conversations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
