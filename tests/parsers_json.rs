// tests/parsers_json.rs
use remote_jobs_aggregator::ingest::parsers::{json_api, ParseError};

const JOBICY_JSON: &str = include_str!("fixtures/jobicy_jobs.json");

#[test]
fn fixture_parses_and_drops_invalid_postings() {
    let records = json_api::parse(JOBICY_JSON, "Jobicy").expect("json parse ok");
    // Five postings; one without a title and one with a relative link are dropped.
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.source == "Jobicy"));
    assert!(records.iter().all(|r| r.source_url.starts_with("https://")));
}

#[test]
fn source_fields_map_directly() {
    let records = json_api::parse(JOBICY_JSON, "Jobicy").unwrap();
    let clerk = records
        .iter()
        .find(|r| r.title == "Entry Level Data Entry Clerk")
        .expect("clerk record");
    assert_eq!(clerk.company.as_deref(), Some("Orbit Labs"));
    assert_eq!(clerk.location, "Anywhere");
    assert_eq!(clerk.source_url, "https://jobicy.com/jobs/data-entry-clerk-1001");
    assert_eq!(clerk.posted_at.to_rfc3339(), "2024-02-10T12:00:00+00:00");
}

#[test]
fn source_tags_are_capped() {
    let records = json_api::parse(JOBICY_JSON, "Jobicy").unwrap();
    let clerk = records
        .iter()
        .find(|r| r.title == "Entry Level Data Entry Clerk")
        .unwrap();
    assert_eq!(clerk.tags.len(), json_api::MAX_SOURCE_TAGS);
    assert_eq!(clerk.tags[0], "data entry");
}

#[test]
fn category_hint_joins_tags_when_room_remains() {
    let body = r#"{"jobs": [{
        "jobTitle": "Customer Success Associate",
        "url": "https://example.com/j/1",
        "jobIndustry": "Customer Service",
        "tags": ["onboarding"]
    }]}"#;
    let records = json_api::parse(body, "Jobicy").unwrap();
    assert_eq!(records[0].tags, vec!["onboarding", "customer service"]);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = json_api::parse("not json at all", "Jobicy").unwrap_err();
    assert!(matches!(err, ParseError::MalformedJson(_)));
}

#[test]
fn missing_listing_field_degrades_to_empty() {
    let records = json_api::parse(r#"{"postings": [1, 2, 3]}"#, "Jobicy").unwrap();
    assert!(records.is_empty());

    let records = json_api::parse(r#"{"jobs": "not an array"}"#, "Jobicy").unwrap();
    assert!(records.is_empty());
}

#[test]
fn data_is_an_accepted_listing_key() {
    let body = r#"{"data": [{
        "title": "Support Agent",
        "link": "https://example.com/j/2",
        "created_at": "2024-05-01T00:00:00Z"
    }]}"#;
    let records = json_api::parse(body, "Api").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Support Agent");
    assert_eq!(records[0].posted_at.to_rfc3339(), "2024-05-01T00:00:00+00:00");
}

#[test]
fn missing_date_defaults_to_ingestion_time() {
    let before = chrono::Utc::now();
    let body = r#"{"jobs": [{"title": "Writer", "url": "https://example.com/j/3"}]}"#;
    let records = json_api::parse(body, "Api").unwrap();
    assert!(records[0].posted_at >= before);
    // And the location default holds when the source has none.
    assert_eq!(records[0].location, "Remote");
}
