//! Financial-year epoch helpers.
//!
//! The portal reports against Indian financial years, which run April 1st
//! through March 31st. Boundaries are computed in Asia/Kolkata and
//! exchanged as Unix epoch seconds, matching the date columns the stored
//! functions expose.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;

/// Epoch seconds for April 1st, 00:00:00 IST of the given financial year.
#[must_use]
pub fn fy_start_epoch(fy_year: i32) -> i64 {
    epoch_at_kolkata(fy_year, 4, 1, 0, 0, 0)
}

/// Epoch seconds for March 31st, 23:59:59 IST closing the given financial
/// year (FY 2024 ends March 31st, 2025).
#[must_use]
pub fn fy_end_epoch(fy_year: i32) -> i64 {
    epoch_at_kolkata(fy_year + 1, 3, 31, 23, 59, 59)
}

/// The financial year that contains `now` (January through March belong to
/// the previous year's FY).
#[must_use]
pub fn current_fy_year(now: DateTime<Utc>) -> i32 {
    let local = now.with_timezone(&Kolkata);
    if local.month() < 4 {
        local.year() - 1
    } else {
        local.year()
    }
}

/// Epoch seconds for the end of the financial year containing `now`.
#[must_use]
pub fn current_fy_end_epoch(now: DateTime<Utc>) -> i64 {
    fy_end_epoch(current_fy_year(now))
}

/// Default reporting window for corporate-action record queries: from the
/// start of the financial year two FYs back through the end of the current
/// financial year.
#[must_use]
pub fn default_records_window(now: DateTime<Utc>) -> (i64, i64) {
    let fy_year = current_fy_year(now);
    (fy_start_epoch(fy_year - 2), fy_end_epoch(fy_year))
}

fn epoch_at_kolkata(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> i64 {
    // IST carries no DST, so the local result is always single.
    Kolkata
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .map_or(0, |dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn test_fy_start_epoch() {
        // 2024-04-01T00:00:00+05:30 == 2024-03-31T18:30:00Z
        assert_eq!(fy_start_epoch(2024), 1_711_909_800);
    }

    #[test]
    fn test_fy_end_epoch() {
        // 2025-03-31T23:59:59+05:30 == 2025-03-31T18:29:59Z
        assert_eq!(fy_end_epoch(2024), 1_743_445_799);
    }

    #[test]
    fn test_fy_covers_full_year() {
        assert_eq!(fy_end_epoch(2023) + 1, fy_start_epoch(2024));
    }

    #[test]
    fn test_current_fy_year_before_april() {
        assert_eq!(current_fy_year(utc(2025, 2, 15, 12)), 2024);
    }

    #[test]
    fn test_current_fy_year_after_april() {
        assert_eq!(current_fy_year(utc(2025, 6, 15, 12)), 2025);
    }

    #[test]
    fn test_current_fy_year_uses_kolkata_boundary() {
        // 2025-03-31T19:00:00Z is already April 1st, 00:30 IST.
        assert_eq!(current_fy_year(utc(2025, 3, 31, 19)), 2025);
        // ...while 18:00Z is still March 31st, 23:30 IST.
        assert_eq!(current_fy_year(utc(2025, 3, 31, 18)), 2024);
    }

    #[test]
    fn test_default_records_window() {
        let now = utc(2025, 6, 1, 9);
        let (start, end) = default_records_window(now);
        assert_eq!(start, fy_start_epoch(2023));
        assert_eq!(end, fy_end_epoch(2025));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Consecutive financial years tile the timeline with no gap and no
    // overlap.
    proptest! {
        #[test]
        fn prop_fiscal_years_are_contiguous(fy_year in 1990i32..2100) {
            prop_assert!(fy_start_epoch(fy_year) < fy_end_epoch(fy_year));
            prop_assert_eq!(fy_end_epoch(fy_year) + 1, fy_start_epoch(fy_year + 1));
        }
    }

    // The default reporting window always spans exactly three financial
    // years and contains the current instant.
    proptest! {
        #[test]
        fn prop_default_window_contains_now(secs in 0i64..4_000_000_000) {
            let now = chrono::DateTime::from_timestamp(secs, 0).expect("valid timestamp");
            let (start, end) = default_records_window(now);
            prop_assert!(start < end);
            prop_assert!(secs >= start);
            prop_assert!(secs <= end);
            prop_assert_eq!(start, fy_start_epoch(current_fy_year(now) - 2));
        }
    }
}
