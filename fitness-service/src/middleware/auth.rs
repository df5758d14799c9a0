use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::dtos::ErrorResponse;
use crate::utils::{extract_token, hash_token};
use crate::AppState;

/// The authenticated caller, resolved from the presented token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// SHA-256 of the presented token, used by logout.
    pub token_hash: String,
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Middleware to require authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token)
        .ok_or_else(|| unauthorized("Authentication credentials were not provided"))?;

    let token_hash = hash_token(token);

    let user_id = state
        .db
        .authenticate_token(&token_hash)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Token lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?
        .ok_or_else(|| unauthorized("Invalid token"))?;

    req.extensions_mut().insert(AuthUser {
        user_id,
        token_hash,
    });

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Auth user missing from request extensions".to_string(),
            }),
        ))
    }
}
