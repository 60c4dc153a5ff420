use crate::auth::jwt::{bearer_token, JwtValidator};
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub validator: JwtValidator,
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user_id = match bearer_token(header).and_then(|t| auth_state.validator.validate(t)) {
        Ok(user_id) => user_id,
        Err(e) => return HttpAppError(e).into_response(),
    };

    tracing::debug!(user_id = %user_id, "Request authenticated");
    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}
