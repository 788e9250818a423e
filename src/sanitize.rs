// src/sanitize.rs
//! Text sanitization for feed payloads: CDATA/tag stripping, HTML entity
//! decoding, and whitespace normalization. Every parser funnels extracted
//! text through here before it lands in a record.

/// Marker appended to excerpts that were cut at the length cap.
pub const ELLIPSIS: char = '\u{2026}';

/// Strip markup and entities down to plain text: remove CDATA wrappers,
/// drop all tag-delimited markup, decode named HTML entities, collapse
/// whitespace runs, trim. Never fails; empty input yields an empty string.
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // 1) CDATA wrappers (common in feed descriptions)
    let mut out = raw.replace("<![CDATA[", "").replace("]]>", "");

    // 2) Strip HTML/XML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Decode named/numeric entities (&amp; &lt; &gt; &quot; &#39; &nbsp;
    //    &mdash; &ndash; &hellip; and the rest of the named set)
    out = html_escape::decode_html_entities(&out).to_string();

    // 4) Collapse whitespace (includes the NBSP left by &nbsp;)
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Sanitize `raw` and cap it at `max_chars`, appending an ellipsis when cut.
/// Truncation counts chars, not bytes, so multibyte text stays valid.
pub fn excerpt(raw: &str, max_chars: usize) -> String {
    let text = sanitize(raw);
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    while cut.ends_with(' ') {
        cut.pop();
    }
    cut.push(ELLIPSIS);
    cut
}

/// Replace HTML-only named entities that are undefined in XML before the
/// payload reaches the XML deserializer, which would otherwise reject them.
pub fn scrub_xml_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
