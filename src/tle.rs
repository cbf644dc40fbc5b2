//! # Two-line element records and parsing
//!
//! Utilities to parse **NORAD two-line element** text into
//! [`ClassicalElements`] usable by the geometry and propagation pipeline.
//!
//! ## Overview
//! -----------------
//! This module provides:
//! - [`TleRecord`], the raw fetched record (two lines plus catalog identity),
//!   immutable once built.
//! - [`parse_elements`], which converts the two lines into typed classical
//!   elements with angles in **degrees** and the epoch as a UTC
//!   [`hifitime::Epoch`].
//!
//! ## Units & Conventions
//! -----------------
//! - **Input format:** standard fixed-column two-line element ASCII lines.
//! - **Eccentricity:** stored in the record as an implied-decimal digit string
//!   (`"0002945"` means `0.0002945`). The decimal is reconstructed by
//!   prefixing `0.` to the raw digits; this is a textual convention of the
//!   format, never a power-of-ten scale of the digit count.
//! - **Mean motion:** revolutions per day, read from its fixed columns so the
//!   adjacent revolution counter can never bleed into the value.
//! - **Epoch:** two-digit year (`>= 57` maps to 1900s) plus fractional day of
//!   year, converted through [`tle_epoch_to_utc`].
//!
//! ## Error Handling
//! -----------------
//! Failures are surfaced as [`OrbitrackError::TleParse`] naming the offending
//! field: missing/empty lines, a line 2 with fewer than 8 whitespace-separated
//! fields, or any field that fails numeric conversion.

use std::ops::Range;

use serde::Serialize;

use crate::classical_element::ClassicalElements;
use crate::constants::NoradId;
use crate::orbitrack_errors::OrbitrackError;
use crate::time::tle_epoch_to_utc;

/// Minimum number of whitespace-separated fields on a well-formed line 2.
const LINE2_MIN_FIELDS: usize = 8;

/// A raw two-line element record for one satellite.
///
/// Created by the upstream TLE source, consumed by [`parse_elements`] and by
/// the SGP4 adapter, then discarded; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TleRecord {
    pub norad_id: NoradId,
    /// Satellite name as reported by the upstream catalog, when available.
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    /// Parse this record's lines into classical elements.
    pub fn elements(&self) -> Result<ClassicalElements, OrbitrackError> {
        parse_elements(&self.line1, &self.line2)
    }
}

/// Parse the two lines of a TLE record into [`ClassicalElements`].
///
/// Arguments
/// -----------------
/// * `line1`: first line of the record (epoch fields).
/// * `line2`: second line of the record (element fields).
///
/// Return
/// ----------
/// * The typed element set, or [`OrbitrackError::TleParse`] naming the field
///   that could not be read.
///
/// See also
/// ------------
/// * [`ClassicalElements`] – Normalized element container.
/// * [`crate::geometry::derive_geometry`] – Next pipeline stage.
pub fn parse_elements(line1: &str, line2: &str) -> Result<ClassicalElements, OrbitrackError> {
    if line1.trim().is_empty() || line2.trim().is_empty() {
        return Err(OrbitrackError::TleParse(
            "a TLE record requires two non-empty lines".to_string(),
        ));
    }
    if !line1.starts_with('1') {
        return Err(OrbitrackError::TleParse(
            "line 1 does not start with '1'".to_string(),
        ));
    }
    if !line2.starts_with('2') {
        return Err(OrbitrackError::TleParse(
            "line 2 does not start with '2'".to_string(),
        ));
    }

    let fields = line2.split_whitespace().count();
    if fields < LINE2_MIN_FIELDS {
        return Err(OrbitrackError::TleParse(format!(
            "line 2 has {fields} fields, expected at least {LINE2_MIN_FIELDS}"
        )));
    }

    let epoch_year: i32 = parse_field(line1, 18..20, "epoch year")?;
    let epoch_day = parse_field(line1, 20..32, "epoch day")?;
    let full_year = if epoch_year >= 57 {
        1900 + epoch_year
    } else {
        2000 + epoch_year
    };

    let inclination = parse_field(line2, 8..16, "inclination")?;
    let raan = parse_field(line2, 17..25, "right ascension")?;
    let eccentricity = parse_implied_decimal(line2, 26..33)?;
    let arg_perigee = parse_field(line2, 34..42, "argument of perigee")?;
    let mean_anomaly = parse_field(line2, 43..51, "mean anomaly")?;
    let mean_motion = parse_field(line2, 52..63, "mean motion")?;

    Ok(ClassicalElements::new(
        tle_epoch_to_utc(full_year, epoch_day),
        mean_motion,
        eccentricity,
        inclination,
        raan,
        arg_perigee,
        mean_anomaly,
    ))
}

/// Extract and parse one fixed-column numeric field.
fn parse_field<T: std::str::FromStr>(
    line: &str,
    slice: Range<usize>,
    label: &str,
) -> Result<T, OrbitrackError> {
    line.get(slice.clone())
        .ok_or_else(|| {
            OrbitrackError::TleParse(format!(
                "line too short for {label} (columns {}..{})",
                slice.start, slice.end
            ))
        })?
        .trim()
        .parse()
        .map_err(|_| OrbitrackError::TleParse(format!("invalid {label} field")))
}

/// Reconstruct the implied-decimal eccentricity from its raw digit string.
fn parse_implied_decimal(line: &str, slice: Range<usize>) -> Result<f64, OrbitrackError> {
    let digits = line
        .get(slice)
        .ok_or_else(|| OrbitrackError::TleParse("line too short for eccentricity".to_string()))?
        .trim();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OrbitrackError::TleParse(format!(
            "invalid eccentricity field: {digits:?}"
        )));
    }

    format!("0.{digits}")
        .parse()
        .map_err(|_| OrbitrackError::TleParse(format!("invalid eccentricity field: {digits:?}")))
}

#[cfg(test)]
mod tle_test {
    use super::*;
    use approx::assert_relative_eq;

    const ISS_LINE1: &str = "1 25544U 98067A   20148.21301450  .00001715  00000-0  38778-4 0  9992";
    const ISS_LINE2: &str = "2 25544  51.6435  92.2789 0002570 358.0648 144.9972 15.49396855228767";

    #[test]
    fn test_parse_iss_record() {
        let elements = parse_elements(ISS_LINE1, ISS_LINE2).unwrap();
        assert_relative_eq!(elements.inclination, 51.6435);
        assert_relative_eq!(elements.raan, 92.2789);
        assert_relative_eq!(elements.eccentricity, 0.0002570);
        assert_relative_eq!(elements.arg_perigee, 358.0648);
        assert_relative_eq!(elements.mean_anomaly, 144.9972);
        assert_relative_eq!(elements.mean_motion, 15.49396855);

        let (y, m, d, _, _, _, _) = elements.epoch.to_gregorian_utc();
        assert_eq!((y, m, d), (2020, 5, 27));
    }

    #[test]
    fn test_implied_decimal_eccentricity() {
        // "0002945" reads as 0.0002945, whatever the digit count suggests
        let line2 = "2 43039   0.0135 206.8784 0002945   5.6523  96.6140  1.00270383 1234";
        let elements = parse_elements(ISS_LINE1, line2).unwrap();
        assert_relative_eq!(elements.eccentricity, 0.0002945);
        assert_relative_eq!(elements.mean_motion, 1.00270383);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        // mean motion dropped: 7 fields left
        let line2 = "2 25544  51.6435  92.2789 0002570 358.0648 144.9972";
        let err = parse_elements(ISS_LINE1, line2).unwrap_err();
        assert_eq!(
            err,
            OrbitrackError::TleParse("line 2 has 7 fields, expected at least 8".to_string())
        );
    }

    #[test]
    fn test_empty_line_is_rejected() {
        assert!(matches!(
            parse_elements(ISS_LINE1, "   "),
            Err(OrbitrackError::TleParse(_))
        ));
        assert!(matches!(
            parse_elements("", ISS_LINE2),
            Err(OrbitrackError::TleParse(_))
        ));
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let line2 = "2 25544  51.6435  92.2789 00x2570 358.0648 144.9972 15.49396855228767";
        let err = parse_elements(ISS_LINE1, line2).unwrap_err();
        assert!(matches!(err, OrbitrackError::TleParse(ref msg) if msg.contains("eccentricity")));
    }

    #[test]
    fn test_record_elements_passthrough() {
        let record = TleRecord {
            norad_id: 25544,
            name: Some("SPACE STATION".to_string()),
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        };
        assert_eq!(record.elements().unwrap().raan, 92.2789);
    }
}
