// src/enrich.rs
//! Field inference over normalized posting text: company extraction from
//! title patterns, the beginner-friendliness gate, category classification
//! via an ordered rule table, and tag generation. Everything here is a pure
//! function of text; matching is case-folded.

use once_cell::sync::Lazy;
use regex::Regex;

/// Category assigned when no classification rule matches.
pub const OTHER_CATEGORY: &str = "other";

/// Upper bound on the tag list; earliest tags win.
pub const MAX_TAGS: usize = 6;

/// Captured company names at or past this length are rejected as noise.
const MAX_COMPANY_LEN: usize = 50;

const BEGINNER_TERMS: &[&str] = &[
    "entry",
    "junior",
    "intern",
    "graduate",
    "trainee",
    "assistant",
    "coordinator",
    "associate",
    "no experience",
];

const SENIOR_TERMS: &[&str] = &[
    "senior",
    "sr.",
    "lead",
    "principal",
    "staff engineer",
    "director",
    "head of",
    "5+ years",
    "7+ years",
    "10+ years",
    "expert",
];

/// Ordered classification rules; the first matching pattern wins, so the
/// order must not be reshuffled.
static CATEGORY_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"customer (service|support|success|care)|help ?desk|support (rep|agent|specialist|engineer)",
            "customer-service",
        ),
        (
            r"marketing|\bseo\b|social media|content (marketer|strategist)|growth|email campaign",
            "marketing",
        ),
        (
            r"\bsales\b|account (executive|manager)|business development|\bsdr\b|\bbdr\b",
            "sales",
        ),
        (
            r"writ(er|ing)|copywrit|editor|proofread|blogger|journalis|transcri(be|ption)",
            "writing",
        ),
        (
            r"design(er)?\b|\bux\b|\bui\b|graphic|figma|illustrat",
            "design",
        ),
        (
            r"developer|engineer|programm(er|ing)|software|front[ -]?end|back[ -]?end|full[ -]?stack|devops|\bqa\b",
            "development",
        ),
        (
            r"data (analyst|entry|scientist|engineer)|analytics|\bsql\b|machine learning",
            "data",
        ),
        (
            r"virtual assistant|\bva\b|executive assistant|admin(istrative)? assistant",
            "virtual-assistant",
        ),
        (
            r"project manag|product manag|scrum|program manag|project coordinat",
            "project-management",
        ),
    ]
    .iter()
    .map(|(pat, cat)| {
        (
            Regex::new(&format!("(?i){pat}")).expect("category rule regex"),
            *cat,
        )
    })
    .collect()
});

/// Try the title patterns in order (" at Name", "| Name", " - Name"), then
/// fall back to an emphasized span in the raw description. Returns `None`
/// when nothing captures a plausible name.
pub fn extract_company(title: &str, description: &str) -> Option<String> {
    static RE_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bat\s+([^|]+)$").expect("company 'at' regex"));
    static RE_PIPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|\s*([^|]+)$").expect("company pipe regex"));
    static RE_DASH: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s[-\u{2013}\u{2014}]\s(.+)$").expect("company dash regex"));
    static RE_EMPHASIS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?is)<(?:strong|b)>\s*([^<]+?)\s*</(?:strong|b)>").expect("company emphasis regex")
    });

    for re in [&*RE_AT, &*RE_PIPE, &*RE_DASH] {
        if let Some(name) = re
            .captures(title)
            .and_then(|c| c.get(1))
            .and_then(|m| clean_company(m.as_str()))
        {
            return Some(name);
        }
    }

    RE_EMPHASIS
        .captures(description)
        .and_then(|c| c.get(1))
        .and_then(|m| clean_company(m.as_str()))
}

fn clean_company(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '.' | ',' | ':' | ';' | '(' | ')'))
        .trim();
    if name.is_empty() || name.chars().count() >= MAX_COMPANY_LEN {
        return None;
    }
    Some(name.to_string())
}

/// Inclusive-by-default gate: a posting passes when it mentions a beginner
/// term, or when it carries no seniority signal at all.
pub fn is_beginner_friendly(text: &str) -> bool {
    let t = text.to_lowercase();
    if BEGINNER_TERMS.iter().any(|term| t.contains(term)) {
        return true;
    }
    !SENIOR_TERMS.iter().any(|term| t.contains(term))
}

/// First-match-wins walk of the rule table; `other` when nothing hits.
pub fn classify_category(text: &str) -> &'static str {
    for (re, category) in CATEGORY_RULES.iter() {
        if re.is_match(text) {
            return category;
        }
    }
    OTHER_CATEGORY
}

pub fn push_unique(tags: &mut Vec<String>, tag: &str) {
    let tag = tag.trim();
    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// Generate descriptive tags in salience order: experience level, employment
/// type, the `remote` marker, the resolved category, and a `no-experience`
/// marker. Deduplicated and capped at [`MAX_TAGS`].
pub fn build_tags(text: &str, category: &str) -> Vec<String> {
    let t = text.to_lowercase();
    let mut tags = Vec::new();

    if ["entry level", "entry-level", "no experience", "graduate", "trainee"]
        .iter()
        .any(|term| t.contains(term))
    {
        push_unique(&mut tags, "entry-level");
    }
    if t.contains("junior") {
        push_unique(&mut tags, "junior");
    }
    if t.contains("senior") {
        push_unique(&mut tags, "senior");
    }

    // Employment type: first match wins, full-time is the default.
    if t.contains("part-time") || t.contains("part time") {
        push_unique(&mut tags, "part-time");
    } else if t.contains("contract") || t.contains("freelance") {
        push_unique(&mut tags, "contract");
    } else if t.contains("intern") {
        push_unique(&mut tags, "internship");
    } else {
        push_unique(&mut tags, "full-time");
    }

    push_unique(&mut tags, "remote");

    if category != OTHER_CATEGORY {
        push_unique(&mut tags, category);
    }

    if t.contains("no experience") || t.contains("no prior experience") {
        push_unique(&mut tags, "no-experience");
    }

    tags.truncate(MAX_TAGS);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_from_at_pattern() {
        assert_eq!(
            extract_company("Customer Support Rep at Acme Corp", ""),
            Some("Acme Corp".to_string())
        );
    }

    #[test]
    fn company_from_pipe_and_dash_patterns() {
        assert_eq!(
            extract_company("Junior Designer | Nimbus", ""),
            Some("Nimbus".to_string())
        );
        assert_eq!(
            extract_company("Data Entry Clerk - Orbit Labs", ""),
            Some("Orbit Labs".to_string())
        );
    }

    #[test]
    fn hyphenated_titles_do_not_leak_a_company() {
        assert_eq!(extract_company("Entry-Level Developer", ""), None);
    }

    #[test]
    fn company_falls_back_to_emphasized_span() {
        let desc = "<p><strong>Brightside Health</strong> is hiring a support agent.</p>";
        assert_eq!(
            extract_company("Support Agent", desc),
            Some("Brightside Health".to_string())
        );
    }

    #[test]
    fn overlong_captures_are_rejected() {
        let title = format!("Support Rep at {}", "x".repeat(60));
        assert_eq!(extract_company(&title, ""), None);
    }

    #[test]
    fn beginner_terms_pass_the_gate() {
        assert!(is_beginner_friendly("Entry level support role"));
        assert!(is_beginner_friendly("Junior developer, remote"));
    }

    #[test]
    fn senior_only_postings_fail_the_gate() {
        assert!(!is_beginner_friendly("Senior staff engineer, 10+ years"));
    }

    #[test]
    fn neutral_postings_pass_by_default() {
        assert!(is_beginner_friendly("Content writer for our blog"));
    }

    #[test]
    fn beginner_term_outranks_senior_term() {
        assert!(is_beginner_friendly("Junior role reporting to a senior lead"));
    }

    #[test]
    fn category_rule_order_is_first_match_wins() {
        // "support engineer" hits customer-service before development.
        assert_eq!(classify_category("Support Engineer"), "customer-service");
        assert_eq!(classify_category("Backend Developer"), "development");
        assert_eq!(classify_category("Virtual Assistant"), "virtual-assistant");
        assert_eq!(classify_category("Llama Groomer"), OTHER_CATEGORY);
    }

    #[test]
    fn every_category_rule_is_reachable() {
        let samples = [
            ("customer service agent", "customer-service"),
            ("seo marketing specialist", "marketing"),
            ("sales account executive", "sales"),
            ("copywriter wanted", "writing"),
            ("graphic designer", "design"),
            ("software engineer", "development"),
            ("data analyst", "data"),
            ("virtual assistant", "virtual-assistant"),
            ("project manager", "project-management"),
        ];
        for (text, want) in samples {
            assert_eq!(classify_category(text), want, "text: {text}");
        }
    }

    #[test]
    fn tags_are_ordered_deduped_and_capped() {
        let tags = build_tags(
            "Entry level junior support, part-time, no experience needed",
            "customer-service",
        );
        assert_eq!(
            tags,
            vec![
                "entry-level",
                "junior",
                "part-time",
                "remote",
                "customer-service",
                "no-experience"
            ]
        );
        assert!(tags.len() <= MAX_TAGS);
        let mut unique = tags.clone();
        unique.dedup();
        assert_eq!(unique, tags);
    }

    #[test]
    fn full_time_is_the_default_employment_tag() {
        let tags = build_tags("Writer for product docs", "writing");
        assert_eq!(tags, vec!["full-time", "remote", "writing"]);
    }

    #[test]
    fn other_category_is_not_tagged() {
        let tags = build_tags("General operations help", OTHER_CATEGORY);
        assert!(!tags.iter().any(|t| t == OTHER_CATEGORY));
        assert!(tags.iter().any(|t| t == "remote"));
    }
}
