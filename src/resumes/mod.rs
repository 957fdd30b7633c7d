pub mod dto;
pub mod handlers;
pub(crate) mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::resume_routes()
}
