// src/ingest/parsers/json_api.rs
//! Structured API parser for the JSON-shaped sources. The payload root must
//! deserialize; a missing or non-array listing field degrades to an empty
//! result. Field names vary across the APIs we pull from, so each field is
//! read through an ordered list of known keys.

use chrono::Utc;
use metrics::{counter, histogram};
use serde_json::Value;

use super::{parse_feed_date, strip_query, is_absolute_url, ParseError, EXCERPT_MAX_CHARS};
use crate::enrich::push_unique;
use crate::ingest::types::{JobRecord, REMOTE_LOCATION};
use crate::sanitize;

/// Cap on tags taken from the source itself.
pub const MAX_SOURCE_TAGS: usize = 5;

const LISTING_KEYS: &[&str] = &["jobs", "data"];
const TITLE_KEYS: &[&str] = &["title", "jobTitle", "position"];
const URL_KEYS: &[&str] = &["url", "link", "jobUrl", "apply_url"];
const COMPANY_KEYS: &[&str] = &["company", "companyName", "company_name"];
const DATE_KEYS: &[&str] = &["date", "pubDate", "publication_date", "created_at"];
const DESCRIPTION_KEYS: &[&str] = &["description", "excerpt", "jobExcerpt", "jobDescription"];
const LOCATION_KEYS: &[&str] = &["location", "jobGeo", "candidate_required_location"];
const CATEGORY_KEYS: &[&str] = &["category", "jobIndustry"];

pub fn parse(body: &str, source: &str) -> Result<Vec<JobRecord>, ParseError> {
    let t0 = std::time::Instant::now();

    let root: Value = serde_json::from_str(body)?;

    let listing = LISTING_KEYS
        .iter()
        .find_map(|key| root.get(*key))
        .and_then(Value::as_array);
    let Some(items) = listing else {
        tracing::warn!(source, "json payload has no job listing field");
        return Ok(Vec::new());
    };

    let total = items.len();
    let mut out = Vec::with_capacity(total);
    for item in items {
        if let Some(rec) = map_posting(item, source) {
            out.push(rec);
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_parse_ms").record(ms);
    counter!("ingest_jobs_parsed_total").increment(out.len() as u64);
    tracing::debug!(
        source,
        items = total,
        kept = out.len(),
        dropped = total - out.len(),
        "parsed json listing"
    );

    Ok(out)
}

/// First non-empty string among the known keys for a field.
fn str_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn map_posting(item: &Value, source: &str) -> Option<JobRecord> {
    let title = str_field(item, TITLE_KEYS)?.to_string();

    let source_url = strip_query(str_field(item, URL_KEYS)?).to_string();
    if !is_absolute_url(&source_url) {
        return None;
    }

    let company = str_field(item, COMPANY_KEYS).map(str::to_string);

    let posted_at = str_field(item, DATE_KEYS)
        .and_then(parse_feed_date)
        .unwrap_or_else(Utc::now);

    let excerpt = str_field(item, DESCRIPTION_KEYS)
        .map(|d| sanitize::excerpt(d, EXCERPT_MAX_CHARS))
        .unwrap_or_default();

    let location = str_field(item, LOCATION_KEYS)
        .unwrap_or(REMOTE_LOCATION)
        .to_string();

    let mut tags: Vec<String> = Vec::new();
    if let Some(source_tags) = item.get("tags").and_then(Value::as_array) {
        for tag in source_tags.iter().filter_map(Value::as_str) {
            if tags.len() >= MAX_SOURCE_TAGS {
                break;
            }
            push_unique(&mut tags, &tag.to_lowercase());
        }
    }
    // A source-supplied category rides along as a tag so classification
    // sees it later.
    if let Some(category) = str_field(item, CATEGORY_KEYS) {
        if tags.len() < MAX_SOURCE_TAGS {
            push_unique(&mut tags, &category.to_lowercase());
        }
    }

    Some(JobRecord {
        title,
        company,
        source: source.to_string(),
        source_url,
        posted_at,
        location,
        excerpt,
        category: String::new(),
        tags,
    })
}
