//! Pure header parsing shared by every transport.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};

/// Lower-cases keys, trims values, drops blanks and joins repeated headers with `,`.
pub(crate) fn normalize_headers(raw: &[(String, String)]) -> BTreeMap<String, String> {
    let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (name, value) in raw {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let values = grouped.entry(name).or_default();
        let value = value.trim();
        if !value.is_empty() {
            values.push(value);
        }
    }

    grouped
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| (name, values.join(",")))
        .collect()
}

/// Splits `Content-Type` into the media type and the `charset` parameter.
pub(crate) fn split_content_type(value: &str) -> (Option<String>, Option<String>) {
    let mut parts = value.split(';');
    let mime_type = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let charset = parts
        .filter_map(|part| part.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, v)| v.trim().trim_matches('"').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    (mime_type, charset)
}

/// `Content-Length` as bytes; anything but a plain decimal number is unknown.
pub(crate) fn parse_file_size(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// `Last-Modified` as a Unix timestamp.
///
/// Accepts a bare number of seconds, the three HTTP-date forms (IMF-fixdate,
/// RFC 850, asctime) and RFC 3339.
pub(crate) fn parse_last_modified(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    for format in ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp());
        }
    }
    None
}
