/// Trim whitespace (including non-breaking spaces from scraped HTML) and strip
/// outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Like [`clean_str`], but maps an empty result to None.
pub fn clean_opt(raw: Option<&str>) -> Option<String> {
    raw.map(clean_str).filter(|s| !s.is_empty())
}

/// Parse a numeric cell. `Ok(None)` for blanks and FRED's `.` missing marker,
/// an error for anything else that is not a number.
pub fn parse_value(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let s = clean_str(raw);
    if s.is_empty() || s == "." {
        return Ok(None);
    }
    s.trim_end_matches('%').parse::<f64>().map(Some)
}
