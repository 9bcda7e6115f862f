//! Feature routes
//!
//! Each feature owns its routes; [`router`] merges them under one state.

pub mod downloads;
pub mod items;
pub mod schedules;

use axum::Router;

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(schedules::schedules_routes())
        .merge(downloads::downloads_routes())
        .merge(items::items_routes())
        .with_state(state)
}
