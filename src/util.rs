use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Stopwatch label, `HH:MM:SS`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Append `c` to `field` unless it would push the display width past `max_width`
pub fn push_within_width(field: &mut String, c: char, max_width: usize) -> bool {
    let mut candidate = field.clone();
    candidate.push(c);
    if candidate.width() > max_width {
        return false;
    }
    *field = candidate;
    true
}
