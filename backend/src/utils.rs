use chrono::{DateTime, NaiveDate};

/// Case-insensitive substring test used for keyword matching.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Round to one decimal place, e.g. 33.333 -> 33.3
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of `count` in `total` as a percentage with one decimal, 0 when total is 0.
pub fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_tenth(count as f64 / total as f64 * 100.0)
}

/// Convert a Unix timestamp (seconds, as a string) to its UTC calendar date.
pub fn parse_unix_date(timestamp: &str) -> Option<NaiveDate> {
    let seconds = timestamp.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}

/// The YouTube Data API returns snippet text HTML-escaped.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Strip the anti-JSON-hijacking prefix (e.g. `)]}',`) some Google endpoints prepend.
pub fn strip_json_prefix(body: &str) -> &str {
    match body.find(['{', '[']) {
        Some(start) => &body[start..],
        None => body,
    }
}
