use axum::Router;

use crate::db::AppState;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    handlers::car_routes()
}
