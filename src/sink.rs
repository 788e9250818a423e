// src/sink.rs
//! Durable write of the result document. The write is idempotent: when the
//! on-disk document already carries the same sources and jobs, nothing is
//! touched and the caller is told so.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::ingest::types::{JobIndex, JobRecord};

pub const DEFAULT_OUTPUT_PATH: &str = "public/jobs.json";
pub const ENV_OUTPUT_PATH: &str = "JOBS_OUTPUT_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

pub fn output_path() -> PathBuf {
    std::env::var(ENV_OUTPUT_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_PATH))
}

/// Serialize the index and write it, skipping the write when the existing
/// document matches. `updated_at` and the per-job `posted_at` are excluded
/// from the comparison so a re-run over identical payloads is a no-op:
/// records whose source carries no usable date get the run's ingestion
/// time as `posted_at`, which differs on every run.
pub async fn write_index(path: &Path, index: &JobIndex) -> Result<WriteOutcome> {
    let body = serde_json::to_string_pretty(index).context("serializing job index")?;

    if let Ok(existing) = fs::read_to_string(path).await {
        if is_unchanged(&existing, &body, index) {
            return Ok(WriteOutcome::Unchanged);
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    Ok(WriteOutcome::Written)
}

fn is_unchanged(existing: &str, body: &str, index: &JobIndex) -> bool {
    match serde_json::from_str::<JobIndex>(existing) {
        Ok(prev) => prev.sources == index.sources && same_jobs(&prev.jobs, &index.jobs),
        // Not a document we wrote; fall back to a raw comparison.
        Err(_) => existing.trim() == body.trim(),
    }
}

/// Positional job comparison that skips `posted_at`; everything else about
/// the records, including their order, must match.
fn same_jobs(prev: &[JobRecord], next: &[JobRecord]) -> bool {
    prev.len() == next.len()
        && prev.iter().zip(next).all(|(a, b)| {
            a.title == b.title
                && a.company == b.company
                && a.source == b.source
                && a.source_url == b.source_url
                && a.location == b.location
                && a.excerpt == b.excerpt
                && a.category == b.category
                && a.tags == b.tags
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{JobRecord, REMOTE_LOCATION};
    use chrono::{TimeZone, Utc};

    fn index(titles: &[&str]) -> JobIndex {
        let jobs: Vec<JobRecord> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| JobRecord {
                title: t.to_string(),
                company: None,
                source: "Test".to_string(),
                source_url: format!("https://example.com/j/{i}"),
                posted_at: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
                location: REMOTE_LOCATION.to_string(),
                excerpt: String::new(),
                category: "other".to_string(),
                tags: vec!["remote".to_string()],
            })
            .collect();
        JobIndex {
            updated_at: Utc::now(),
            total_jobs: jobs.len(),
            sources: vec!["Test".to_string()],
            jobs,
        }
    }

    #[tokio::test]
    async fn first_write_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/out/jobs.json");
        let out = write_index(&path, &index(&["Writer"])).await.unwrap();
        assert_eq!(out, WriteOutcome::Written);
        let on_disk: JobIndex =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.total_jobs, 1);
    }

    #[tokio::test]
    async fn rewrite_with_same_jobs_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("jobs.json");
        let first = index(&["Writer", "Editor"]);
        assert_eq!(write_index(&path, &first).await.unwrap(), WriteOutcome::Written);

        // Same jobs, later timestamp: still a no-op.
        let mut second = index(&["Writer", "Editor"]);
        second.updated_at = Utc::now();
        assert_eq!(
            write_index(&path, &second).await.unwrap(),
            WriteOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn shifted_posted_at_alone_does_not_force_a_rewrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("jobs.json");
        let first = index(&["Writer"]);
        write_index(&path, &first).await.unwrap();

        // Same posting, later ingestion-time default for its date.
        let mut second = index(&["Writer"]);
        second.jobs[0].posted_at = Utc::now();
        assert_eq!(
            write_index(&path, &second).await.unwrap(),
            WriteOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn changed_jobs_are_rewritten() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("jobs.json");
        write_index(&path, &index(&["Writer"])).await.unwrap();
        let out = write_index(&path, &index(&["Writer", "Editor"]))
            .await
            .unwrap();
        assert_eq!(out, WriteOutcome::Written);
        let on_disk: JobIndex =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.total_jobs, 2);
    }

    #[tokio::test]
    async fn foreign_file_content_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("jobs.json");
        std::fs::write(&path, "not json at all").unwrap();
        let out = write_index(&path, &index(&["Writer"])).await.unwrap();
        assert_eq!(out, WriteOutcome::Written);
    }
}
