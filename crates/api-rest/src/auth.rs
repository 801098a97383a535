//! Caller identification.
//!
//! Every request outside the public paths must carry `X-User-Id`. In the
//! dev profile a missing header falls back to a fixed seed identity so
//! local tooling works without a gateway; a malformed header is rejected in
//! both profiles.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use medrec_core::Profile;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Identity substituted for headerless requests in the dev profile.
pub const DEV_FALLBACK_USER: Uuid = Uuid::from_u128(1);

const PUBLIC_PREFIXES: &[&str] = &["/health", "/api-docs", "/swagger-ui"];

/// The authenticated caller, attached to request extensions by
/// [`require_caller`].
#[derive(Clone, Copy, Debug)]
pub struct CallerId(pub Uuid);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerId>()
            .copied()
            .ok_or(ApiError::Unauthenticated)
    }
}

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub async fn require_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let header = request.headers().get(USER_ID_HEADER);
    let caller = match header {
        Some(raw) => match raw.to_str().ok().and_then(|s| Uuid::parse_str(s.trim()).ok()) {
            Some(id) => id,
            None => {
                tracing::debug!("rejected request with malformed {USER_ID_HEADER}");
                return ApiError::Unauthenticated.into_response();
            }
        },
        None if state.profile == Profile::Dev => DEV_FALLBACK_USER,
        None => return ApiError::Unauthenticated.into_response(),
    };

    request.extensions_mut().insert(CallerId(caller));
    next.run(request).await
}
