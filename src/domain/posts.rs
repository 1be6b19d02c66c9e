//! Post field rules shared by the form layer and the post service.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use time::{
    Date, Month, OffsetDateTime, UtcOffset, format_description::FormatItem,
    macros::format_description,
};

use super::error::DomainError;

/// Column width of every bounded text column in `blog_posts`.
pub const MAX_FIELD_LENGTH: usize = 250;

/// "Month DD, YYYY", e.g. `October 07, 2026`.
const POST_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day], [year]");

/// Format a calendar date the way post bylines display it.
pub fn format_post_date(date: Date) -> Result<String, DomainError> {
    date.format(POST_DATE_FORMAT)
        .map_err(|err| DomainError::invariant(format!("failed to format post date: {err}")))
}

/// Calendar date of `time` as observed in `tz`.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Result<Date, DomainError> {
    let utc = time.to_offset(UtcOffset::UTC);
    let datetime_utc = DateTime::<Utc>::from_timestamp(utc.unix_timestamp(), utc.nanosecond())
        .ok_or_else(|| DomainError::invariant("timestamp outside supported range"))?;
    let localized = tz.from_utc_datetime(&datetime_utc.naive_utc());

    let month = u8::try_from(localized.month())
        .ok()
        .and_then(|value| Month::try_from(value).ok())
        .ok_or_else(|| DomainError::invariant("invalid month from timezone conversion"))?;
    let day = u8::try_from(localized.day())
        .map_err(|_| DomainError::invariant("invalid day from timezone conversion"))?;

    Date::from_calendar_date(localized.year(), month, day)
        .map_err(|err| DomainError::invariant(format!("invalid calendar date: {err}")))
}

/// Today's post date in the given timezone.
pub fn current_post_date(tz: Tz) -> Result<String, DomainError> {
    let today = localized_date(OffsetDateTime::now_utc(), tz)?;
    format_post_date(today)
}

/// Reject blank required values.
pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("`{field}` must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn post_date_uses_long_month_and_padded_day() {
        assert_eq!(
            format_post_date(date!(2026 - 10 - 07)).unwrap(),
            "October 07, 2026"
        );
        assert_eq!(
            format_post_date(date!(2024 - 02 - 29)).unwrap(),
            "February 29, 2024"
        );
    }

    #[test]
    fn localized_date_crosses_midnight_in_timezone() {
        let instant = datetime!(2026-01-01 03:30 UTC);
        assert_eq!(
            localized_date(instant, chrono_tz::UTC).unwrap(),
            date!(2026 - 01 - 01)
        );
        assert_eq!(
            localized_date(instant, chrono_tz::America::New_York).unwrap(),
            date!(2025 - 12 - 31)
        );
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(ensure_non_empty("   ", "title").is_err());
        assert!(ensure_non_empty("Hello", "title").is_ok());
    }
}
