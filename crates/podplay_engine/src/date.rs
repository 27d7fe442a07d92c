use chrono::{DateTime, Utc};

/// Parse a feed timestamp (RFC 822 style, e.g. `Wed, 02 Oct 2024 10:00:00 GMT`).
///
/// Never fails: absent, blank or unparseable input yields the current instant,
/// so every episode carries a concrete date.
pub fn normalize_date(raw: Option<&str>) -> DateTime<Utc> {
    normalize_date_with(raw, &Utc::now)
}

/// Same as [`normalize_date`] with an injected fallback clock.
pub fn normalize_date_with(raw: Option<&str>, now: &dyn Fn() -> DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return now();
    };
    match DateTime::parse_from_rfc2822(raw) {
        Ok(parsed) => parsed.with_timezone(&Utc),
        Err(_) => now(),
    }
}
