use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, PublicUser, RegisterInput},
        jwt::AuthUser,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_user))
}

#[instrument(skip(state, input))]
pub async fn register(
    State(state): State<AppState>,
    input: RegisterInput,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let response = services::register(state.users.as_ref(), &state.jwt, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = services::current_user(state.users.as_ref(), user_id).await?;
    Ok(Json(user))
}
