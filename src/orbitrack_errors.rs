use serde::Serialize;
use thiserror::Error;

use crate::constants::NoradId;

#[derive(Error, Debug)]
pub enum OrbitrackError {
    #[error("TLE fetch failed with HTTP status {status}: {message}")]
    UpstreamFetch { status: u16, message: String },

    #[error("TLE data not found in the upstream response for satellite {0}")]
    TleMissing(NoradId),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("Malformed upstream payload: {0}")]
    UpstreamPayloadError(#[from] serde_json::Error),

    #[error("Malformed TLE record: {0}")]
    TleParse(String),

    #[error(
        "Orbit is physically invalid: semi-major axis {semi_major_axis_km} km, \
         eccentricity {eccentricity}, periapsis {periapsis_km} km is at or below \
         the {floor_km} km safety floor"
    )]
    InvalidOrbit {
        semi_major_axis_km: f64,
        eccentricity: f64,
        periapsis_km: f64,
        floor_km: f64,
    },

    #[error("SGP4 TLE parsing failed: {0}")]
    Sgp4Tle(#[from] sgp4::TleError),

    #[error("SGP4 element initialization failed: {0}")]
    Sgp4Elements(#[from] sgp4::ElementsError),

    #[error("SGP4 propagation failed: {0}")]
    Propagation(#[from] sgp4::Error),

    #[error("Epoch outside the representable propagation range: {0}")]
    EpochOutOfRange(String),

    #[error("Invalid sampling request: {0}")]
    InvalidSampling(String),
}

/// Coarse classification of an [`OrbitrackError`], used by the tracking facade
/// to tag structured failure payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The upstream TLE source failed or returned an unusable payload
    UpstreamFetch,
    /// The two-line element text could not be parsed
    Parse,
    /// Derived geometry violates a physical invariant
    InvalidOrbit,
    /// The propagator rejected the elements or the requested epoch
    Propagation,
    /// The caller's sampling request was malformed
    Request,
}

impl OrbitrackError {
    pub fn kind(&self) -> ErrorKind {
        use OrbitrackError::*;
        match self {
            UpstreamFetch { .. } | TleMissing(_) | UreqHttpError(_) | UpstreamPayloadError(_) => {
                ErrorKind::UpstreamFetch
            }
            TleParse(_) => ErrorKind::Parse,
            InvalidOrbit { .. } => ErrorKind::InvalidOrbit,
            Sgp4Tle(_) | Sgp4Elements(_) | Propagation(_) | EpochOutOfRange(_) => {
                ErrorKind::Propagation
            }
            InvalidSampling(_) => ErrorKind::Request,
        }
    }
}

impl PartialEq for OrbitrackError {
    fn eq(&self, other: &Self) -> bool {
        use OrbitrackError::*;
        match (self, other) {
            (
                UpstreamFetch {
                    status: a,
                    message: ma,
                },
                UpstreamFetch {
                    status: b,
                    message: mb,
                },
            ) => a == b && ma == mb,
            (TleMissing(a), TleMissing(b)) => a == b,
            (TleParse(a), TleParse(b)) => a == b,
            (
                InvalidOrbit {
                    semi_major_axis_km: a1,
                    eccentricity: e1,
                    periapsis_km: p1,
                    floor_km: f1,
                },
                InvalidOrbit {
                    semi_major_axis_km: a2,
                    eccentricity: e2,
                    periapsis_km: p2,
                    floor_km: f2,
                },
            ) => a1 == a2 && e1 == e2 && p1 == p2 && f1 == f2,
            (EpochOutOfRange(a), EpochOutOfRange(b)) => a == b,
            (InvalidSampling(a), InvalidSampling(b)) => a == b,

            // Wrapped library errors are not comparable: equal if same variant
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (UpstreamPayloadError(_), UpstreamPayloadError(_)) => true,
            (Sgp4Tle(_), Sgp4Tle(_)) => true,
            (Sgp4Elements(_), Sgp4Elements(_)) => true,
            (Propagation(_), Propagation(_)) => true,

            _ => false,
        }
    }
}
