//! Timetable file routes
//!
//! `GET /json/:date` serves the stored `<date>.json` as-is. The body's MD5
//! digest doubles as a strong `ETag`.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use ts_common::{checksum, ScheduleDate};

use crate::api::AppError;
use crate::AppState;

pub fn schedules_routes() -> Router<AppState> {
    Router::new().route("/json/:date", get(get_json))
}

/// Fetch a stored timetable by date
///
/// GET /json/20250318
async fn get_json(
    State(state): State<AppState>,
    Path(raw_date): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let date: ScheduleDate = raw_date
        .parse()
        .map_err(|e: ts_common::TsError| AppError::BadRequest(e.to_string()))?;

    let path = state.crawler.storage_path(date);
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File for date {} not found", date)));
        },
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read timetable");
            return Err(AppError::Internal(format!("An unexpected error occurred: {}", e)));
        },
    };

    let etag = format!("\"{}\"", checksum::digest(&content));

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == etag);
    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        content,
    )
        .into_response())
}
