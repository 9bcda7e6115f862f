//! Item echo route

use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Item {
    pub item_id: i64,
    pub q: Option<String>,
}

pub fn items_routes() -> Router<AppState> {
    Router::new().route("/items/:item_id", get(read_item))
}

/// GET /items/5?q=somequery
async fn read_item(Path(item_id): Path<i64>, Query(query): Query<ItemQuery>) -> Json<Item> {
    Json(Item {
        item_id,
        q: query.q,
    })
}
