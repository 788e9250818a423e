// src/ingest/parsers/mod.rs
pub mod json_api;
pub mod rss;

use chrono::{DateTime, Utc};
use thiserror::Error;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

/// Excerpt length cap, chars.
pub const EXCERPT_MAX_CHARS: usize = 180;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed xml feed: {0}")]
    MalformedXml(#[from] quick_xml::de::DeError),
    #[error("malformed json payload: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Parse a feed timestamp, trying RFC 2822 (`Mon, 01 Jan 2024 00:00:00 GMT`)
/// and then RFC 3339. `None` when neither fits; callers default to now.
pub fn parse_feed_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    let parsed = OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .ok()?;
    let unix = parsed.to_offset(UtcOffset::UTC).unix_timestamp();
    DateTime::from_timestamp(unix, 0)
}

/// Drop the query string so tracking parameters don't fork otherwise
/// identical links.
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

pub fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
