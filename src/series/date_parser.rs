use once_cell::sync::Lazy;
use regex::Regex;

use crate::month::MonthKey;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})").expect("year regex"));
static MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-(\d{1,2})").expect("month regex"));

/// Pull the year and month out of an observation date such as `"1948-01-01"`
/// or `"1948-01"`. Returns None when either part is missing or the month is
/// not 1..=12.
pub fn parse_observation_month(s: &str) -> Option<MonthKey> {
    let s = s.trim().trim_matches('"');
    let year: i32 = YEAR_RE.captures(s)?.get(1)?.as_str().parse().ok()?;
    let month: u32 = MONTH_RE.captures(s)?.get(1)?.as_str().parse().ok()?;
    MonthKey::from_parts(year, month)
}
