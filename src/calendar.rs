//! Storefront Calendar
//!
//! All eligibility windows and delivery estimates are evaluated against the
//! storefront's wall clock, a fixed +06:00 offset. The offset never observes
//! daylight saving, so a [`FixedOffset`] is exact.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

/// Seconds east of UTC for the storefront wall clock.
pub const STORE_UTC_OFFSET_SECS: i32 = 6 * 3600;

/// Wire format of legacy order timestamps (`"DD-MM-YY | HH:mm"`).
const LEGACY_TIMESTAMP_FORMAT: &str = "%d-%m-%y | %H:%M";

/// Errors raised while interpreting calendar input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// The order timestamp matched none of the accepted formats.
    #[error("unrecognised order timestamp: {0}")]
    UnrecognisedTimestamp(String),
}

/// The storefront's fixed UTC offset.
pub fn store_offset() -> FixedOffset {
    match FixedOffset::east_opt(STORE_UTC_OFFSET_SECS) {
        Some(offset) => offset,
        None => unreachable!("offset is within ±24 hours"),
    }
}

/// Last representable instant of `date` on the storefront wall clock.
///
/// Expiry dates are inclusive through the end of the expiry day, so an offer
/// expiring on the 30th is still live at 23:59 storefront time that night.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let Some(last_instant) = date.and_hms_milli_opt(23, 59, 59, 999) else {
        unreachable!("23:59:59.999 exists on every calendar day")
    };

    attach_store_offset(last_instant).with_timezone(&Utc)
}

/// Parse an order timestamp into the storefront wall clock.
///
/// Two formats are accepted:
/// - the legacy `"DD-MM-YY | HH:mm"` wire format, whose two-digit year means
///   `2000 + YY`;
/// - RFC 3339 (with a naive `"YYYY-MM-DDTHH:MM:SS"` / `"YYYY-MM-DD HH:MM:SS"`
///   fallback, read as storefront-local time).
///
/// # Errors
///
/// Returns [`CalendarError::UnrecognisedTimestamp`] when the input matches
/// none of the accepted formats.
pub fn parse_order_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, CalendarError> {
    let trimmed = raw.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, LEGACY_TIMESTAMP_FORMAT) {
        let adjusted = into_current_century(naive)
            .ok_or_else(|| CalendarError::UnrecognisedTimestamp(raw.to_string()))?;

        return Ok(attach_store_offset(adjusted));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&store_offset()));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(attach_store_offset(naive));
        }
    }

    Err(CalendarError::UnrecognisedTimestamp(raw.to_string()))
}

/// Format an instant as a long-form date, e.g. `"August 06, 2026"`.
pub fn long_date(at: DateTime<FixedOffset>) -> String {
    at.format("%B %d, %Y").to_string()
}

/// Shift an instant by whole days on the storefront wall clock.
pub fn plus_days(at: DateTime<FixedOffset>, days: i64) -> Option<DateTime<FixedOffset>> {
    at.checked_add_signed(Duration::try_days(days)?)
}

/// Shift an instant by whole hours on the storefront wall clock.
pub fn plus_hours(at: DateTime<FixedOffset>, hours: i64) -> Option<DateTime<FixedOffset>> {
    at.checked_add_signed(Duration::try_hours(hours)?)
}

/// Interpret a naive storefront-local time as an absolute instant.
fn attach_store_offset(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    match naive.and_local_timezone(store_offset()).single() {
        Some(instant) => instant,
        None => unreachable!("fixed offsets map local times unambiguously"),
    }
}

/// Re-base a two-digit-year parse onto the `2000 + YY` convention.
///
/// `chrono` follows POSIX and maps `69..=99` into the 1900s; the legacy wire
/// format always means the 2000s.
fn into_current_century(naive: NaiveDateTime) -> Option<NaiveDateTime> {
    if naive.year() < 2000 {
        naive.with_year(naive.year() + 100)
    } else {
        Some(naive)
    }
}
