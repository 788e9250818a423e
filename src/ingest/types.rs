// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location marker for this domain; every posting is remote by definition.
pub const REMOTE_LOCATION: &str = "Remote";

/// How a source's payload is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
    Json,
}

/// Static configuration for one upstream feed or API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind,
        }
    }
}

/// One normalized job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub source: String,
    pub source_url: String,
    pub posted_at: DateTime<Utc>,
    pub location: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl JobRecord {
    /// Dedup key: sha-256 over the lower-cased, whitespace-collapsed
    /// title joined with the canonical link. Derived on demand, never
    /// serialized.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};

        let title: String = self
            .title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let url = self.source_url.trim().to_lowercase();

        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();

        let mut out = String::with_capacity(32);
        for b in digest.iter().take(16) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

/// The single artifact one pipeline run produces; built once, then emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobIndex {
    pub updated_at: DateTime<Utc>,
    pub total_jobs: usize,
    pub sources: Vec<String>,
    pub jobs: Vec<JobRecord>,
}
