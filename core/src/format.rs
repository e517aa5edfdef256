//! Display helpers shared by the pages and the CLI.
//!
//! Everything here is a pure function of its inputs except `random_color`
//! and `generate_id`, which draw from the thread RNG.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

pub const UNKNOWN_DURATION: &str = "Unknown duration";

pub const DEFAULT_TRUNCATE_LENGTH: usize = 100;

pub const DEFAULT_BYTE_DECIMALS: i32 = 2;

const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

const BYTE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Accent palette used for decorative highlights.
pub const PALETTE: [&str; 8] = [
    "#0ea5e9", "#d946ef", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#84cc16",
];

static DURATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(\d+)\s*min(?:ute)?s?\b", "${1} minutes"),
        (r"(?i)(\d+)\s*hour", "${1} hour"),
        (r"(?i)(\d+)\s*week", "${1} week"),
        (r"(?i)(\d+)\s*day", "${1} day"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

static SLUG_SEPARATORS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").ok());

static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Normalize loose duration strings such as `30 min` or `2hours`.
///
/// Only the first matching pattern is applied, once. Strings matching no
/// pattern come back unchanged.
pub fn format_duration(duration: &str) -> String {
    if duration.is_empty() {
        return UNKNOWN_DURATION.to_string();
    }
    for (re, replacement) in DURATION_PATTERNS.iter() {
        if re.is_match(duration) {
            return re.replace(duration, *replacement).into_owned();
        }
    }
    duration.to_string()
}

/// Relative age of `timestamp` as seen from now.
pub fn format_time_ago(timestamp: &str) -> String {
    format_time_ago_at(timestamp, Utc::now())
}

/// Relative age of `timestamp` as seen from `now`. Timestamps without an
/// offset are read as UTC; unparseable input is returned as-is.
pub fn format_time_ago_at(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(timestamp) else {
        return timestamp.to_string();
    };
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    let (count, unit) = if seconds < 3_600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3_600, "hour")
    } else {
        (seconds / 86_400, "day")
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Percentage of `completed` out of `total`, rounded. Zero when `total` is 0.
pub fn calculate_progress(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

/// Style tokens for a difficulty badge.
pub fn difficulty_color(difficulty: &str) -> &'static str {
    match difficulty.to_lowercase().as_str() {
        "beginner" => "text-accent-600 bg-accent-50",
        "intermediate" => "text-primary-600 bg-primary-50",
        "advanced" => "text-secondary-600 bg-secondary-50",
        _ => "text-neutral-600 bg-neutral-50",
    }
}

/// Cut `text` to `max_length` characters, trim, and append `...`.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let head: String = text.chars().take(max_length).collect();
    format!("{}...", head.trim())
}

pub fn lesson_slug(course_title: &str, lesson_title: &str) -> String {
    format!("{}/{}", slugify(course_title), slugify(lesson_title))
}

fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    match SLUG_SEPARATORS.as_ref() {
        Some(re) => re.replace_all(&lowered, "-").into_owned(),
        None => lowered,
    }
}

/// Objectives stored as a JSON list string; anything else is one objective.
pub fn parse_learning_objectives(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(_) => vec![raw.to_string()],
    }
}

pub fn format_progress(percentage: f64) -> String {
    format!("{}%", percentage.round() as i64)
}

pub fn random_color() -> &'static str {
    PALETTE.choose(&mut rand::thread_rng()).copied().unwrap_or(PALETTE[0])
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

/// Short random id: random base-36 digits followed by the time in base 36.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    format!("{}{}", random_base36(11), to_base36(millis))
}

/// Message to show for an arbitrary error.
pub fn error_message(err: &dyn std::error::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// Human-readable byte size, e.g. `1536` → `1.5 KB`.
pub fn format_bytes(bytes: u64, decimals: i32) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let decimals = decimals.max(0) as usize;
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{scaled:.decimals$}");
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    format!("{trimmed} {}", BYTE_UNITS[unit])
}

pub(crate) fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

pub(crate) fn random_base36(len: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| DIGITS[rng.gen_range(0..DIGITS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn duration_minutes_are_spelled_out() {
        assert_eq!(format_duration("30 min"), "30 minutes");
        assert_eq!(format_duration("45min"), "45 minutes");
        assert_eq!(format_duration("30 minutes"), "30 minutes");
        assert_eq!(format_duration("About 20 MIN"), "About 20 minutes");
    }

    #[test]
    fn duration_other_units_keep_their_suffix() {
        assert_eq!(format_duration("2 hours"), "2 hours");
        assert_eq!(format_duration("3weeks"), "3 weeks");
        assert_eq!(format_duration("1 day"), "1 day");
    }

    #[test]
    fn duration_falls_back() {
        assert_eq!(format_duration(""), "Unknown duration");
        assert_eq!(format_duration("6-8 weeks"), "6-8 weeks");
        assert_eq!(format_duration("self paced"), "self paced");
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let at = |d: Duration| (now - d).to_rfc3339();
        assert_eq!(format_time_ago_at(&at(Duration::seconds(30)), now), "Just now");
        assert_eq!(format_time_ago_at(&at(Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(format_time_ago_at(&at(Duration::minutes(5)), now), "5 minutes ago");
        assert_eq!(format_time_ago_at(&at(Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_time_ago_at(&at(Duration::days(1)), now), "1 day ago");
        assert_eq!(format_time_ago_at(&at(Duration::days(40)), now), "40 days ago");
    }

    #[test]
    fn time_ago_reads_naive_timestamps_as_utc() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago_at("2024-05-10T09:59:59.500000", now), "2 hours ago");
        assert_eq!(format_time_ago_at("2024-05-10T12:05:00", now), "Just now");
        assert_eq!(format_time_ago_at("yesterday", now), "yesterday");
    }

    #[test]
    fn progress_handles_zero_total() {
        assert_eq!(calculate_progress(5, 0), 0);
        assert_eq!(calculate_progress(0, 0), 0);
        assert_eq!(calculate_progress(1, 3), 33);
        assert_eq!(calculate_progress(2, 3), 67);
        assert_eq!(calculate_progress(4, 4), 100);
    }

    #[test]
    fn difficulty_color_is_case_insensitive() {
        assert_eq!(difficulty_color("Beginner"), difficulty_color("beginner"));
        assert_eq!(difficulty_color("ADVANCED"), "text-secondary-600 bg-secondary-50");
        assert_eq!(difficulty_color("intermediate"), "text-primary-600 bg-primary-50");
        assert_eq!(difficulty_color("Beginner to Intermediate"), "text-neutral-600 bg-neutral-50");
        assert_eq!(difficulty_color(""), "text-neutral-600 bg-neutral-50");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly", 7), "exactly");
        assert_eq!(truncate_text("hello world again", 6), "hello...");
        assert_eq!(truncate_text("ééééé", 2), "éé...");
    }

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(
            lesson_slug("Python for Data Analysis", "Pandas: Series & DataFrames"),
            "python-for-data-analysis/pandas-series-dataframes"
        );
    }

    #[test]
    fn objectives_parse_json_lists_only() {
        assert_eq!(parse_learning_objectives(r#"["a","b"]"#), vec!["a", "b"]);
        assert_eq!(parse_learning_objectives("Use JOINs"), vec!["Use JOINs"]);
        assert_eq!(parse_learning_objectives(r#"{"a":1}"#), vec![r#"{"a":1}"#]);
    }

    #[test]
    fn progress_label_rounds() {
        assert_eq!(format_progress(66.6), "67%");
        assert_eq!(format_progress(0.0), "0%");
    }

    #[test]
    fn random_color_comes_from_palette() {
        for _ in 0..20 {
            assert!(PALETTE.contains(&random_color()));
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.io"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn generated_ids_are_base36_and_distinct() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn error_message_falls_back_on_empty_text() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(error_message(&err), "disk full");
        let err = std::io::Error::new(std::io::ErrorKind::Other, "");
        assert_eq!(error_message(&err), "An unexpected error occurred");
    }

    #[test]
    fn bytes_pick_the_largest_unit() {
        assert_eq!(format_bytes(0, DEFAULT_BYTE_DECIMALS), "0 Bytes");
        assert_eq!(format_bytes(1024, DEFAULT_BYTE_DECIMALS), "1 KB");
        assert_eq!(format_bytes(1536, DEFAULT_BYTE_DECIMALS), "1.5 KB");
        assert_eq!(format_bytes(1000, DEFAULT_BYTE_DECIMALS), "1000 Bytes");
        assert_eq!(format_bytes(1_234_567, 1), "1.2 MB");
        assert_eq!(format_bytes(1_234_567, -3), "1 MB");
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(random_base36(11).len(), 11);
    }
}
