//! Manual re-download routes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use ts_common::ScheduleDate;
use ts_ingest::DateOutcome;

use crate::api::{AppError, MessageResponse};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForceDownloadQuery {
    pub file_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ForceDownloadDetails {
    Date {
        outcome: DateOutcome,
    },
    All {
        saved: Vec<ScheduleDate>,
        unchanged: Vec<ScheduleDate>,
        failed: Vec<ScheduleDate>,
    },
}

pub fn downloads_routes() -> Router<AppState> {
    Router::new().route("/force-download", get(force_download))
}

/// Re-download one date, or every listed file, ignoring stored digests
///
/// GET /force-download?file_date=20250318
async fn force_download(
    State(state): State<AppState>,
    Query(query): Query<ForceDownloadQuery>,
) -> Result<Json<MessageResponse<ForceDownloadDetails>>, AppError> {
    let Some(raw_date) = query.file_date.filter(|d| !d.trim().is_empty()) else {
        let report = state.crawler.run_for_all(true).await?;
        return Ok(Json(MessageResponse {
            message: "Force download completed for all files".to_string(),
            details: ForceDownloadDetails::All {
                saved: report.saved,
                unchanged: report.unchanged,
                failed: report.failed,
            },
        }));
    };

    let date: ScheduleDate = raw_date
        .trim()
        .parse()
        .map_err(|e: ts_common::TsError| AppError::BadRequest(e.to_string()))?;

    match state.crawler.run_for_date(date, true).await? {
        DateOutcome::NotListed => Err(AppError::NotFound(format!(
            "File for date {} not found on the page",
            date
        ))),
        DateOutcome::DownloadFailed => Err(AppError::Upstream(format!(
            "Failed to download content for {}",
            date.file_name()
        ))),
        outcome => Ok(Json(MessageResponse {
            message: format!("Force download completed for date {}", date),
            details: ForceDownloadDetails::Date { outcome },
        })),
    }
}
