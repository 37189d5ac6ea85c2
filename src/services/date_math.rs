//! Calendar helpers shared by the room, cost and route engines.
//!
//! All dates are calendar days, so interval math never has to normalise
//! times of day.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::error::{Result, TourOpsError};

pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";

/// Furthest a leg may sit from arrival, in days.
pub const MAX_DAY_OFFSET: i64 = 366;

/// The group lands the day after the tour's departure date.
pub fn arrival_date(departure: NaiveDate) -> NaiveDate {
    departure + Duration::days(1)
}

/// `date` moved by `days`; fails instead of leaving the calendar.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| {
            TourOpsError::Validation(format!("{} days from {} is out of range", days, date))
        })
}

/// Date of an itinerary leg `day_offset` days after arrival.
pub fn leg_date(departure: NaiveDate, day_offset: i64) -> Result<NaiveDate> {
    add_days(arrival_date(departure), day_offset)
}

/// Nights between two dates, never negative.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(0)
}

/// Half-open overlap of `[a_in, a_out)` and `[b_in, b_out)`.
pub fn overlaps(a_in: NaiveDate, a_out: NaiveDate, b_in: NaiveDate, b_out: NaiveDate) -> bool {
    a_in < b_out && a_out > b_in
}

pub fn validate_range(check_in: NaiveDate, check_out: NaiveDate) -> Result<()> {
    if check_out <= check_in {
        return Err(TourOpsError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    Ok(())
}

/// `date + offset` rendered the way rooming lists and vouchers print dates.
pub fn format_offset(date: NaiveDate, offset: i64) -> String {
    match add_days(date, offset) {
        Ok(moved) => moved.format(DISPLAY_FORMAT).to_string(),
        Err(_) => format!("day {}", offset),
    }
}

/// Parses the date shapes that show up in imported rooming lists.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, DISPLAY_FORMAT))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
}
