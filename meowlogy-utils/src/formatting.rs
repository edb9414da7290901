use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Format a timestamp as a 24h wall-clock label (e.g. "09:05").
pub fn format_clock<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%H:%M").to_string()
}

/// Wrap a failure reason in the apology shown in place of an AI answer.
pub fn apology(reason: &str) -> String {
    format!("Sorry, there was an error: {}", reason)
}

/// Keep whatever part of an answer already arrived, then mark it as broken off.
pub fn apology_after_partial(partial: &str, reason: &str) -> String {
    if partial.trim().is_empty() {
        return apology(reason);
    }

    format!("{}\n\n{}", partial, apology(reason))
}

/// Render one transcript line: "[09:05] Cat Care AI: text".
pub fn transcript_line(clock: &str, speaker: &str, text: &str) -> String {
    let body = if text.is_empty() { "\u{2026}" } else { text };
    format!("[{}] {}: {}", clock, speaker, body)
}

/// Render a numbered fact for list output, with the id when the backend sent one.
pub fn fact_line(position: usize, fact: &str, id: Option<&str>, likes: Option<u64>) -> String {
    let mut line = format!("{:>3}. {}", position, fact.trim());
    match (id, likes) {
        (Some(id), Some(likes)) => line.push_str(&format!("  ({} \u{b7} {} likes)", id, likes)),
        (Some(id), None) => line.push_str(&format!("  ({})", id)),
        (None, Some(likes)) => line.push_str(&format!("  ({} likes)", likes)),
        (None, None) => {}
    }
    line
}
