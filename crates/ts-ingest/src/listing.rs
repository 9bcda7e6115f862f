//! Listing page parsing
//!
//! The portal renders its downloads as plain anchors:
//!
//! ```html
//! <a href="/tra-ods-web/ods/download/dataResource/exceptionDataResource/<32 hex>">20250318.json</a>
//! ```

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use ts_common::ScheduleDate;

use crate::error::{IngestError, Result};

const HREF_PATTERN: &str =
    r"^/tra-ods-web/ods/download/dataResource/exceptionDataResource/[0-9a-f]{32}$";
const TEXT_PATTERN: &str = r"^(\d{8})\.json$";

/// A downloadable timetable advertised on the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub url: String,
    pub date: ScheduleDate,
}

/// Extract every timetable link from the listing HTML, in page order.
pub fn parse_listing(html: &str, source_base_url: &str) -> Result<Vec<ListedFile>> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").map_err(|e| IngestError::Parser(e.to_string()))?;
    let href_pattern = Regex::new(HREF_PATTERN)?;
    let text_pattern = Regex::new(TEXT_PATTERN)?;
    let base = source_base_url.trim_end_matches('/');

    let mut files = Vec::new();

    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href_pattern.is_match(href) {
            continue;
        }

        let text: String = element.text().collect();
        let Some(captures) = text_pattern.captures(text.trim()) else {
            continue;
        };

        match captures[1].parse::<ScheduleDate>() {
            Ok(date) => {
                debug!(date = %date, href, "Found timetable link");
                files.push(ListedFile {
                    url: format!("{}{}", base, href),
                    date,
                });
            },
            Err(e) => warn!(href, error = %e, "Skipping link with invalid date"),
        }
    }

    Ok(files)
}
