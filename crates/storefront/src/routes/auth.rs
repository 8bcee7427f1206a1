//! Authentication route handlers.
//!
//! Password hashing is CPU-bound, so registration and login run the
//! [`AuthService`](crate::services::AuthService) on the blocking pool.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::extract::Json;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthError;
use crate::state::AppState;

/// Username and password, for both registration and login.
#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Register a new customer account.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<Credentials>,
) -> Result<impl IntoResponse> {
    let user = run_auth(state, move |state| {
        state
            .auth()
            .register_with_password(&form.username, &form.password)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and start a session.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<Credentials>,
) -> Result<Json<User>> {
    let user = run_auth(state, move |state| {
        state
            .auth()
            .login_with_password(&form.username, &form.password)
    })
    .await
    .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    set_current_user(&session, &CurrentUser::from(&user))
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, user.username.as_str());
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(user))
}

/// End the session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in user's account.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    Ok(Json(state.users().get(current.id)?))
}

/// Run an auth operation off the async executor.
async fn run_auth<T, F>(state: AppState, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> std::result::Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&state))
        .await
        .map_err(|e| AppError::Internal(format!("auth task failed: {e}")))?
        .map_err(AppError::from)
}
