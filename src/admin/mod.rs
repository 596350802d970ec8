pub mod dto;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use handlers::require_admin;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::admin_routes())
}
