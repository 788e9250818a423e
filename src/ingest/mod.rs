// src/ingest/mod.rs
pub mod config;
pub mod parsers;
pub mod types;

use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::enrich;
use crate::fetch::{Accept, BodyFetcher};
use crate::ingest::types::{JobIndex, JobRecord, SourceKind, SourceSpec};

/// Upper bound on the emitted job list; oldest records past it are dropped.
pub const MAX_JOBS: usize = 2000;

/// One-time metrics registration (so series show up on a scrape).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_jobs_parsed_total",
            "Records parsed from source payloads."
        );
        describe_counter!(
            "ingest_jobs_kept_total",
            "Records kept after inference + filtering."
        );
        describe_counter!(
            "ingest_jobs_filtered_total",
            "Records dropped by the beginner-friendliness gate."
        );
        describe_counter!(
            "ingest_jobs_dedup_total",
            "Records removed as cross-source duplicates."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Source fetch/parse failures."
        );
        describe_histogram!("ingest_parse_ms", "Source parse time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when the pipeline last completed."
        );
    });
}

/// Fetch and parse one source. Failures bubble up to the caller, which
/// logs them and moves on; a bad source never aborts the run.
async fn collect_source(fetcher: &dyn BodyFetcher, spec: &SourceSpec) -> Result<Vec<JobRecord>> {
    let accept = match spec.kind {
        SourceKind::Rss => Accept::Feed,
        SourceKind::Json => Accept::Json,
    };
    let body = fetcher.fetch_body(&spec.url, accept).await?;
    let records = match spec.kind {
        SourceKind::Rss => parsers::rss::parse(&body, &spec.name)?,
        SourceKind::Json => parsers::json_api::parse(&body, &spec.name)?,
    };
    Ok(records)
}

/// Inference pass over freshly parsed records: beginner gate, category
/// classification, tag merge, company fill.
pub fn normalize_records(records: Vec<JobRecord>) -> Vec<JobRecord> {
    records.into_iter().filter_map(normalize_record).collect()
}

fn normalize_record(mut rec: JobRecord) -> Option<JobRecord> {
    let combined = format!("{} {} {}", rec.title, rec.excerpt, rec.tags.join(" ")).to_lowercase();

    if !enrich::is_beginner_friendly(&combined) {
        return None;
    }

    if rec.category.is_empty() {
        rec.category = enrich::classify_category(&combined).to_string();
    }

    // Generated markers lead so `remote` and the category always survive
    // the cap; source tags fill the remaining slots.
    let mut tags = enrich::build_tags(&combined, &rec.category);
    for tag in &rec.tags {
        enrich::push_unique(&mut tags, tag);
    }
    tags.truncate(enrich::MAX_TAGS);
    rec.tags = tags;

    if rec.company.is_none() {
        rec.company = enrich::extract_company(&rec.title, &rec.excerpt);
    }

    Some(rec)
}

/// Drop every record whose fingerprint was already seen this run; the
/// first occurrence wins and insertion order is preserved.
pub fn dedup_by_fingerprint(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|rec| seen.insert(rec.fingerprint()))
        .collect()
}

/// Merge -> dedup -> sort -> truncate -> package. Pure apart from the
/// `updated_at` stamp, so the ordering guarantees are directly testable.
pub fn assemble(records: Vec<JobRecord>, sources: &[SourceSpec]) -> JobIndex {
    let before = records.len();
    let mut jobs = dedup_by_fingerprint(records);
    counter!("ingest_jobs_dedup_total").increment((before - jobs.len()) as u64);

    // Stable sort: equal timestamps keep their first-seen order.
    jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    jobs.truncate(MAX_JOBS);

    JobIndex {
        updated_at: Utc::now(),
        total_jobs: jobs.len(),
        sources: sources.iter().map(|s| s.name.clone()).collect(),
        jobs,
    }
}

/// One full pipeline run: every source is attempted in order, and a
/// failure in any of them just costs that source's records.
pub async fn run_once(fetcher: &dyn BodyFetcher, sources: &[SourceSpec]) -> JobIndex {
    ensure_metrics_described();

    let mut merged = Vec::new();
    for spec in sources {
        match collect_source(fetcher, spec).await {
            Ok(records) => {
                let parsed = records.len();
                let kept = normalize_records(records);
                counter!("ingest_jobs_kept_total").increment(kept.len() as u64);
                counter!("ingest_jobs_filtered_total").increment((parsed - kept.len()) as u64);
                tracing::info!(
                    source = %spec.name,
                    parsed,
                    kept = kept.len(),
                    "source ingested"
                );
                merged.extend(kept);
            }
            Err(e) => {
                tracing::warn!(source = %spec.name, error = ?e, "source failed, continuing");
                counter!("ingest_source_errors_total").increment(1);
            }
        }
    }

    let index = assemble(merged, sources);
    gauge!("ingest_last_run_ts").set(index.updated_at.timestamp() as f64);
    index
}
