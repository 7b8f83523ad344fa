use chrono::{Datelike, Months, NaiveDate};

/// Whole calendar months elapsed from `anchor` to `date`, signed.
///
/// A month counts once the anchor's day-of-month is reached: Jan 15 → Feb 14
/// is 0 whole months, Jan 15 → Feb 15 is 1. Dates before the anchor produce
/// negative counts.
pub fn elapsed_whole_months(anchor: NaiveDate, date: NaiveDate) -> i64 {
    let mut months = (date.year() as i64 - anchor.year() as i64) * 12
        + (date.month() as i64 - anchor.month() as i64);
    if date.day() < anchor.day() {
        months -= 1;
    }
    months
}

/// `date` advanced by `months` calendar months, day-of-month clamped to the
/// target month's end (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}
