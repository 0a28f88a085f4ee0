use chrono::{DateTime, NaiveDateTime, Utc};

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of single-line content previews
pub const PREVIEW_CHARS: usize = 50;

/// Parse a store timestamp (`YYYY-MM-DD HH:MM:SS`, UTC), falling back to RFC 3339
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive_dt) = NaiveDateTime::parse_from_str(s, FORMAT) {
        Some(naive_dt.and_utc())
    } else {
        s.parse::<DateTime<Utc>>().ok()
    }
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(FORMAT).to_string()
}

/// Truncate on character boundaries, appending `...` when cut
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Single-line preview of note content
pub fn preview(content: &str) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_string(&flattened, PREVIEW_CHARS)
}
