//! Display formatting for participant names.

/// Format a raw booking name for display.
///
/// Booking rows often carry member numbers glued to the name ("12 maria
/// garcia 34"). The leading and trailing digit runs are stripped together
/// with the whitespace around them, and each remaining word is
/// title-cased. All-digit or empty input yields an empty string.
#[must_use]
pub fn display_name(raw: &str) -> String {
    let stripped = raw
        .trim()
        .trim_start_matches(|ch: char| ch.is_ascii_digit())
        .trim_end_matches(|ch: char| ch.is_ascii_digit())
        .trim();

    let mut formatted = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !formatted.is_empty() {
            formatted.push(' ');
        }
        let lowered = word.to_lowercase();
        let mut chars = lowered.chars();
        if let Some(first) = chars.next() {
            formatted.extend(first.to_uppercase());
            formatted.push_str(chars.as_str());
        }
    }
    formatted
}
