use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::{
    CreateResumeRequest, ResumeEnvelope, ResumeList, ResumeWithMessage, UpdateResumeRequest,
};
use super::repo_types::{NewResume, ResumeChanges};
use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    error::{AppError, AppResult, RESUME_NOT_FOUND},
    extract::ApiJson,
    state::AppState,
    store::ResumeStore,
};

pub fn resume_routes() -> Router<AppState> {
    Router::new()
        .route("/resumes", get(list_resumes).post(create_resume))
        .route(
            "/resumes/:id",
            get(get_resume).put(update_resume).delete(delete_resume),
        )
}

/// Ids that do not parse cannot name one of the caller's resumes.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(RESUME_NOT_FOUND))
}

fn required_title(title: Option<String>) -> AppResult<String> {
    match title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(AppError::BadRequest("Title is a required field.".into())),
    }
}

#[instrument(skip(state, body))]
pub async fn create_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateResumeRequest>,
) -> AppResult<Json<ResumeWithMessage>> {
    let title = required_title(body.title)?;
    let resume = state
        .store
        .create_resume(NewResume {
            user_id,
            title,
            content: body.content.unwrap_or_default(),
        })
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "create resume failed");
            AppError::from(e)
        })?;

    info!(%user_id, resume_id = %resume.id, "resume created");
    Ok(Json(ResumeWithMessage {
        message: "Resume created successfully",
        resume,
    }))
}

#[instrument(skip(state))]
pub async fn list_resumes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ResumeList>> {
    let resumes = state.store.list_resumes(user_id).await?;
    Ok(Json(ResumeList { resumes }))
}

#[instrument(skip(state))]
pub async fn get_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ResumeEnvelope>> {
    let id = parse_id(&id)?;
    let resume = state
        .store
        .get_resume(user_id, id)
        .await?
        .ok_or(AppError::NotFound(RESUME_NOT_FOUND))?;
    Ok(Json(ResumeEnvelope { resume }))
}

#[instrument(skip(state, body))]
pub async fn update_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateResumeRequest>,
) -> AppResult<Json<ResumeWithMessage>> {
    let id = parse_id(&id)?;
    let changes = ResumeChanges {
        title: body.title.map(|t| required_title(Some(t))).transpose()?,
        content: body.content,
    };
    let resume = state
        .store
        .update_resume(user_id, id, changes)
        .await?
        .ok_or(AppError::NotFound(RESUME_NOT_FOUND))?;

    info!(%user_id, resume_id = %resume.id, "resume updated");
    Ok(Json(ResumeWithMessage {
        message: "Resume updated successfully",
        resume,
    }))
}

#[instrument(skip(state))]
pub async fn delete_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let policy = state.config.delete_policy;
    if !state.store.delete_resume(user_id, id, policy).await? {
        return Err(AppError::NotFound(RESUME_NOT_FOUND));
    }

    info!(%user_id, resume_id = %id, ?policy, "resume deleted");
    Ok(Json(MessageResponse {
        message: "Resume deleted successfully",
    }))
}
