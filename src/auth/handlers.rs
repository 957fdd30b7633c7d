use anyhow::Context;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest},
        extractors::AuthUser,
        password::{hash_password, verify_login},
        repo_types::NewUser,
    },
    error::{AppError, AppResult, INVALID_CREDENTIALS, INVALID_TOKEN},
    extract::ApiJson,
    state::AppState,
    store::UserStore,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Present and not blank.
fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        non_blank(payload.first_name),
        non_blank(payload.last_name),
        non_blank(payload.email),
        non_blank(payload.password),
    ) else {
        warn!("register with missing fields");
        return Err(AppError::BadRequest(
            "Invalid input. All fields are required.".into(),
        ));
    };

    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("join password hashing task")??;

    let user = match state
        .store
        .create_user(NewUser {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(MessageResponse {
        message: "Account created successfully!",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (non_blank(payload.email), payload.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required.".into(),
        ));
    };
    if password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required.".into(),
        ));
    }
    let email = normalize_email(&email);

    let user = state.store.find_user_by_email(&email).await?;

    // unknown emails cost the same Argon2 work as wrong passwords
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let ok = tokio::task::spawn_blocking(move || verify_login(&password, stored_hash.as_deref()))
        .await
        .context("join password verification task")??;
    let user = match user {
        Some(user) if ok => user,
        Some(user) => {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state.keys.issue(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let Some(user) = state.store.find_user_by_id(user_id).await? else {
        warn!(user_id = %user_id, "token for unknown user");
        return Err(AppError::Unauthorized(INVALID_TOKEN));
    };
    Ok(Json(user.into()))
}
