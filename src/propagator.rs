//! # Position propagation
//!
//! Two interchangeable position sources sit behind the [`Propagate`] seam:
//!
//! - [`Sgp4Propagator`] — numeric propagation through the `sgp4` crate,
//!   initialized straight from the two TLE lines. Positions are
//!   Earth-centered-inertial (TEME) in kilometers.
//! - [`KeplerPropagator`] — analytic two-body propagation on the ideal
//!   ellipse: the mean anomaly advances at the mean-motion rate, Kepler's
//!   equation is solved by Newton iteration, and the perifocal position is
//!   rotated into the inertial frame.
//!
//! Propagation is supported to epochs before, at, or after the element epoch.
//! SGP4 accuracy degrades a few weeks either side of the TLE epoch; nothing
//! here enforces that envelope, callers decide how stale is too stale.
//! Both propagators are deterministic: identical inputs yield identical
//! positions.

use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};

use crate::classical_element::ClassicalElements;
use crate::constants::RADEG;
use crate::geometry::OrbitGeometry;
use crate::orbitrack_errors::OrbitrackError;
use crate::time::epoch_to_datetime;
use crate::tle::TleRecord;

/// One propagated position: a UTC timestamp and an ECI vector in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub epoch: DateTime<Utc>,
    pub position: Vector3<f64>,
}

/// Seam between position consumers and concrete propagation models.
pub trait Propagate {
    /// Compute the ECI position at the given UTC epoch.
    fn position_at(&self, epoch: DateTime<Utc>) -> Result<PositionSample, OrbitrackError>;
}

/// Numeric propagator backed by the `sgp4` crate.
pub struct Sgp4Propagator {
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl Sgp4Propagator {
    /// Initialize the propagator from a raw TLE record.
    ///
    /// Return
    /// ----------
    /// * The ready propagator, or [`OrbitrackError::Sgp4Elements`] /
    ///   [`OrbitrackError::Propagation`] when the record is rejected by the
    ///   element parser or the constants derivation.
    pub fn from_record(record: &TleRecord) -> Result<Self, OrbitrackError> {
        let elements = sgp4::Elements::from_tle(
            record.name.clone(),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )?;
        let constants = sgp4::Constants::from_elements(&elements)?;
        Ok(Sgp4Propagator {
            elements,
            constants,
        })
    }

    /// UTC epoch the underlying elements refer to.
    pub fn epoch(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.elements.datetime, Utc)
    }
}

impl Propagate for Sgp4Propagator {
    fn position_at(&self, epoch: DateTime<Utc>) -> Result<PositionSample, OrbitrackError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&epoch.naive_utc())
            .map_err(|e| OrbitrackError::EpochOutOfRange(e.to_string()))?;
        let prediction = self.constants.propagate(minutes)?;

        Ok(PositionSample {
            epoch,
            position: Vector3::new(
                prediction.position[0],
                prediction.position[1],
                prediction.position[2],
            ),
        })
    }
}

/// Analytic two-body propagator on the unperturbed ellipse.
pub struct KeplerPropagator {
    epoch: DateTime<Utc>,
    mean_motion_rad_s: f64,
    mean_anomaly_rad: f64,
    eccentricity: f64,
    semi_major_axis_km: f64,
    semi_minor_axis_km: f64,
    perifocal_to_eci: Rotation3<f64>,
}

impl KeplerPropagator {
    pub fn new(
        elements: &ClassicalElements,
        geometry: &OrbitGeometry,
    ) -> Result<Self, OrbitrackError> {
        let perifocal_to_eci =
            Rotation3::from_axis_angle(&Vector3::z_axis(), elements.raan * RADEG)
                * Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination_rad())
                * Rotation3::from_axis_angle(&Vector3::z_axis(), elements.arg_perigee * RADEG);

        Ok(KeplerPropagator {
            epoch: epoch_to_datetime(elements.epoch)?,
            mean_motion_rad_s: elements.mean_motion_rad_s(),
            mean_anomaly_rad: elements.mean_anomaly * RADEG,
            eccentricity: geometry.eccentricity,
            semi_major_axis_km: geometry.semi_major_axis_km,
            semi_minor_axis_km: geometry.semi_minor_axis_km,
            perifocal_to_eci,
        })
    }
}

impl Propagate for KeplerPropagator {
    fn position_at(&self, epoch: DateTime<Utc>) -> Result<PositionSample, OrbitrackError> {
        let dt_s = (epoch - self.epoch).num_milliseconds() as f64 / 1_000.0;
        let mean_anomaly = self.mean_anomaly_rad + self.mean_motion_rad_s * dt_s;
        let ecc_anomaly = solve_kepler(mean_anomaly, self.eccentricity);

        let perifocal = Vector3::new(
            self.semi_major_axis_km * (ecc_anomaly.cos() - self.eccentricity),
            self.semi_minor_axis_km * ecc_anomaly.sin(),
            0.0,
        );

        Ok(PositionSample {
            epoch,
            position: self.perifocal_to_eci * perifocal,
        })
    }
}

/// Solve Kepler's equation `E - e·sin(E) = M` for the eccentric anomaly.
///
/// Newton iteration; converges in a handful of steps for any closed orbit.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    const MAX_ITER: usize = 50;
    const TOL: f64 = 1e-12;

    let mut ecc_anomaly = mean_anomaly;
    for _ in 0..MAX_ITER {
        let delta = (ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly)
            / (1.0 - eccentricity * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < TOL {
            break;
        }
    }
    ecc_anomaly
}
