//! Period Selector
//!
//! Picks a sampling period for a time range so that a chart gets a bounded
//! number of data points when the caller does not choose a period.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// (inclusive upper bound of the range in seconds, period in seconds)
const PERIOD_BANDS: &[(i64, i32)] = &[
    (HOUR, 60),         // ~ 1h
    (6 * HOUR, 600),    // 1h ~ 6h
    (12 * HOUR, 1200),  // 6h ~ 12h
    (DAY, 1800),        // 12h ~ 24h
    (3 * DAY, 3600),    // 1d ~ 3d
    (7 * DAY, 10800),   // 3d ~ 7d
    (14 * DAY, 21600),  // 1w ~ 2w
    // A 2w ~ 4w band with period 43200 was meant to sit here but shared the
    // 14 day bound, so ranges up to 4w never reached it. Kept that way.
];

/// Period for anything longer than the last band
const LONGEST_PERIOD: i32 = 86400;

/// Select a period (seconds) for the range `start..end`
pub fn select_period<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i32 {
    let delta = local_epoch_secs(end.naive_local()) - local_epoch_secs(start.naive_local());
    period_for_delta(delta)
}

/// Select a period for a range length given in seconds
pub fn period_for_delta(delta_secs: i64) -> i32 {
    PERIOD_BANDS
        .iter()
        .find(|(upper, _)| delta_secs <= *upper)
        .map(|(_, period)| *period)
        .unwrap_or(LONGEST_PERIOD)
}

/// Epoch seconds of a wall-clock time read in the local time zone
fn local_epoch_secs(naive: NaiveDateTime) -> i64 {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.timestamp(),
        // Skipped by a DST jump; fall back to reading it as UTC
        None => naive.and_utc().timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_band_boundaries_are_inclusive() {
        assert_eq!(period_for_delta(3599), 60);
        assert_eq!(period_for_delta(3600), 60);
        assert_eq!(period_for_delta(3601), 600);
        assert_eq!(period_for_delta(21600), 600);
        assert_eq!(period_for_delta(43200), 1200);
        assert_eq!(period_for_delta(86400), 1800);
        assert_eq!(period_for_delta(259200), 3600);
        assert_eq!(period_for_delta(604800), 10800);
        assert_eq!(period_for_delta(1209600), 21600);
        assert_eq!(period_for_delta(1209601), 86400);
    }

    #[test]
    fn test_three_weeks_uses_longest_period() {
        assert_eq!(period_for_delta(21 * DAY), 86400);
    }

    #[test]
    fn test_empty_and_inverted_ranges() {
        assert_eq!(period_for_delta(0), 60);
        assert_eq!(period_for_delta(-HOUR), 60);
    }

    #[test]
    fn test_select_period_from_timestamps() {
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
        assert_eq!(select_period(&(end - Duration::minutes(30)), &end), 60);
        assert_eq!(select_period(&(end - Duration::hours(5)), &end), 600);
        assert_eq!(select_period(&(end - Duration::days(30)), &end), 86400);
    }

    #[test]
    fn test_select_period_ignores_subsecond_part() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let end = start + Duration::seconds(3600) + Duration::milliseconds(999);
        assert_eq!(select_period(&start, &end), 60);
    }
}
