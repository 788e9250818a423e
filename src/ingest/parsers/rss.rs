// src/ingest/parsers/rss.rs
//! Generic feed parser for the RSS-shaped sources. The serde structs accept
//! the usual tag spellings (`pubDate`/`updated`/`dc:date`,
//! `description`/`summary`/`content:encoded`) so one parser covers every
//! feed of this kind.

use chrono::Utc;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use super::{parse_feed_date, strip_query, is_absolute_url, ParseError, EXCERPT_MAX_CHARS};
use crate::enrich;
use crate::ingest::types::{JobRecord, REMOTE_LOCATION};
use crate::sanitize;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    updated: Option<String>,
    #[serde(rename = "dc:date")]
    dc_date: Option<String>,
    description: Option<String>,
    summary: Option<String>,
    #[serde(rename = "content:encoded")]
    content: Option<String>,
}

/// `<guid>` may carry attributes (`isPermaLink`), so the text content is
/// pulled out explicitly.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Parse one feed payload into partial records. Items without a usable
/// title or absolute link are dropped; drop counts are reported in
/// aggregate, not per record.
pub fn parse(xml: &str, source: &str) -> Result<Vec<JobRecord>, ParseError> {
    let t0 = std::time::Instant::now();

    let xml_clean = sanitize::scrub_xml_entities(xml);
    let rss: Rss = from_str(&xml_clean)?;

    let total = rss.channel.item.len();
    let mut out = Vec::with_capacity(total);
    for item in rss.channel.item {
        if let Some(rec) = map_item(item, source) {
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
        "parsed rss feed"
    );

    Ok(out)
}

fn map_item(item: Item, source: &str) -> Option<JobRecord> {
    let title = sanitize::sanitize(item.title.as_deref().unwrap_or_default());
    if title.is_empty() {
        return None;
    }

    let raw_link = item
        .link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .or(item.guid.as_ref().and_then(|g| g.value.as_deref()).map(str::trim))
        .unwrap_or_default();
    let source_url = strip_query(raw_link).to_string();
    if source_url.is_empty() || !is_absolute_url(&source_url) {
        return None;
    }

    let posted_at = [&item.pub_date, &item.updated, &item.dc_date]
        .into_iter()
        .flatten()
        .find_map(|ts| parse_feed_date(ts))
        .unwrap_or_else(Utc::now);

    let raw_description = item
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .or(item.summary.as_deref().filter(|d| !d.trim().is_empty()))
        .or(item.content.as_deref())
        .unwrap_or_default();

    // The raw description still has its markup here, which the emphasized
    // span fallback in company extraction needs.
    let company = enrich::extract_company(&title, raw_description);

    Some(JobRecord {
        title,
        company,
        source: source.to_string(),
        source_url,
        posted_at,
        location: REMOTE_LOCATION.to_string(),
        excerpt: sanitize::excerpt(raw_description, EXCERPT_MAX_CHARS),
        category: String::new(),
        tags: Vec::new(),
    })
}
