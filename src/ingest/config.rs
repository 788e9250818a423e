// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::{SourceKind, SourceSpec};

const ENV_PATH: &str = "JOBS_SOURCES_PATH";

/// Sources used when no config file is present.
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::new(
            "We Work Remotely",
            "https://weworkremotely.com/categories/remote-customer-support-jobs.rss",
            SourceKind::Rss,
        ),
        SourceSpec::new(
            "Remotive",
            "https://remotive.com/remote-jobs/feed",
            SourceKind::Rss,
        ),
        SourceSpec::new(
            "Jobicy",
            "https://jobicy.com/api/v2/remote-jobs?count=50",
            SourceKind::Json,
        ),
    ]
}

/// Load the source list from an explicit path. Supports TOML or JSON.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load the source list using env var + fallbacks:
/// 1) $JOBS_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// An empty result means "use the built-in defaults".
pub fn load_sources_default() -> Result<Vec<SourceSpec>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("JOBS_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(Vec::new())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceSpec>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported sources format"))
}

fn parse_toml(s: &str) -> Result<Vec<SourceSpec>> {
    #[derive(serde::Deserialize)]
    struct TomlSources {
        sources: Vec<SourceSpec>,
    }
    let v: TomlSources = toml::from_str(s)?;
    Ok(clean_list(v.sources))
}

fn parse_json(s: &str) -> Result<Vec<SourceSpec>> {
    let v: Vec<SourceSpec> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Drop blank entries and duplicate names; source order is meaningful, so
/// the first occurrence of a name wins.
fn clean_list(items: Vec<SourceSpec>) -> Vec<SourceSpec> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let name = it.name.trim();
        if name.is_empty() || it.url.trim().is_empty() {
            continue;
        }
        if seen.insert(name.to_string()) {
            out.push(SourceSpec::new(name, it.url.trim(), it.kind));
        }
    }
    out
}
