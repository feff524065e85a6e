//! Publication date parsing and locale-aware labels.

use chrono::{DateTime, FixedOffset, Locale, Utc};

use crate::app::{BlogError, Result};

/// Day, abbreviated month, full year: "19 Mai 2021".
pub const LABEL_FORMAT: &str = "%d %b %Y";

/// Parse a CMS timestamp.
///
/// Accepts RFC 3339 as well as the colon-less offset the CMS emits
/// (`2021-03-25T19:25:28+0000`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .or_else(|| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z").ok())
}

/// Render a publication date in `locale`, evaluated in UTC.
pub fn format_label(date: &DateTime<FixedOffset>, locale: Locale) -> String {
    let label = date
        .with_timezone(&Utc)
        .format_localized(LABEL_FORMAT, locale)
        .to_string();
    capitalize_month(&label)
}

pub fn parse_locale(name: &str) -> Result<Locale> {
    Locale::try_from(name).map_err(|_| BlogError::InvalidLocale(name.to_string()))
}

// Locales such as pt_BR abbreviate months in lowercase.
fn capitalize_month(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending = true;
    for c in label.chars() {
        if pending && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            pending = false;
        } else {
            out.push(c);
        }
    }
    out
}
