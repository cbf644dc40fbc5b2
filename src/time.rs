use chrono::{DateTime, Utc};
use hifitime::{Epoch, Unit};

use crate::orbitrack_errors::OrbitrackError;

/// Convert a TLE epoch (full year plus fractional day of year) to a UTC epoch.
///
/// Argument
/// --------
/// * `year`: full Gregorian year (the two-digit TLE year already expanded)
/// * `day_of_year`: fractional day of year, 1.0 = January 1 at midnight
///
/// Return
/// ------
/// * the corresponding [`Epoch`] in the UTC time scale
pub fn tle_epoch_to_utc(year: i32, day_of_year: f64) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, 1, 1) + Unit::Day * (day_of_year - 1.0)
}

/// Convert a [`hifitime::Epoch`] to a chrono UTC timestamp.
///
/// Millisecond resolution, which is far below the accuracy of the propagation
/// models this crate feeds.
pub fn epoch_to_datetime(epoch: Epoch) -> Result<DateTime<Utc>, OrbitrackError> {
    let unix_ms = (epoch.to_unix_seconds() * 1_000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(unix_ms)
        .ok_or_else(|| OrbitrackError::EpochOutOfRange(format!("{epoch}")))
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_tle_epoch_to_utc() {
        let epoch = tle_epoch_to_utc(2020, 1.0);
        let (y, m, d, h, min, s, _) = epoch.to_gregorian_utc();
        assert_eq!((y, m, d, h, min, s), (2020, 1, 1, 0, 0, 0));

        let epoch = tle_epoch_to_utc(2020, 148.21301450);
        let (y, m, d, h, _, _, _) = epoch.to_gregorian_utc();
        assert_eq!((y, m, d), (2020, 5, 27));
        assert_eq!(h, 5);
    }

    #[test]
    fn test_epoch_to_datetime() {
        let epoch = tle_epoch_to_utc(2021, 1.5);
        let datetime = epoch_to_datetime(epoch).unwrap();
        assert_eq!(datetime.to_rfc3339(), "2021-01-01T12:00:00+00:00");
    }
}
