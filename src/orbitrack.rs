//! # Orbitrack: the satellite tracking façade
//!
//! This module defines the [`Orbitrack`] struct, the central façade that wires
//! together:
//!
//! 1. **Configuration** ([`OrbitrackConfig`](crate::config::OrbitrackConfig)) —
//!    upstream endpoint, credential, gravitational model, safety margins.
//! 2. **Upstream TLE access** — a [`TleProvider`] implementation, by default
//!    the N2YO client ([`N2yoTleProvider`](crate::n2yo::N2yoTleProvider)).
//! 3. **The tracking pipeline** — TLE parsing, geometry derivation, SGP4
//!    propagation, and position sampling, run once per satellite.
//!
//! ## Key responsibilities
//!
//! - Single entry point for **per-satellite tracks**
//!   ([`track_satellite`](Orbitrack::track_satellite)): current position,
//!   future positions over a horizon, orbital-ellipse equation.
//! - **Dual-satellite reports** ([`get_positions`](Orbitrack::get_positions)):
//!   two fully independent pipelines whose failures never cross-contaminate;
//!   each slot of the report is either a track or a structured failure
//!   payload. Nothing panics past this boundary.
//! - **Orbit variations** ([`orbit_variations`](Orbitrack::orbit_variations)):
//!    systematically perturbed alternatives of a satellite's current orbit.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use orbitrack::config::OrbitrackConfig;
//! use orbitrack::orbitrack::Orbitrack;
//!
//! let tracker = Orbitrack::new(OrbitrackConfig::new("my-api-key"));
//!
//! // Current + next 10 minutes of positions for two satellites
//! let report = tracker.get_positions(25544, 43039);
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```
//!
//! ## Notes
//!
//! - Every report type serializes with `serde`, so a thin HTTP layer can
//!   return them verbatim.
//! - Each invocation is stateless and independent; there is no cache of TLE
//!   records or positions between calls.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::OrbitrackConfig;
use crate::constants::NoradId;
use crate::geometry::{derive_geometry, generate_variations, OrbitGeometry, OrbitVariation};
use crate::n2yo::{N2yoTleProvider, TleProvider};
use crate::orbitrack_errors::{ErrorKind, OrbitrackError};
use crate::propagator::{PositionSample, Sgp4Propagator};
use crate::sampler::PositionSampler;

/// Default look-ahead horizon for a tracking request, in minutes.
pub const DEFAULT_HORIZON_MINUTES: u32 = 10;
/// Default cadence between future samples, in minutes.
pub const DEFAULT_STEP_MINUTES: u32 = 1;

/// One propagated position in the report: UTC timestamp plus ECI components
/// in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionRecord {
    pub epoch: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&PositionSample> for PositionRecord {
    fn from(sample: &PositionSample) -> Self {
        PositionRecord {
            epoch: sample.epoch,
            x: sample.position.x,
            y: sample.position.y,
            z: sample.position.z,
        }
    }
}

/// A sampling step that failed, reported alongside its successful neighbors.
#[derive(Debug, Clone, Serialize)]
pub struct SampleFailureRecord {
    pub index: usize,
    pub epoch: DateTime<Utc>,
    pub error: String,
}

/// Full tracking result for one satellite.
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteTrack {
    pub norad_id: NoradId,
    pub name: Option<String>,
    /// Epoch of the underlying element set.
    pub tle_epoch: DateTime<Utc>,
    pub geometry: OrbitGeometry,
    /// Cartesian orbital-plane ellipse equation.
    pub ellipse_equation: String,
    /// Position at the requested start epoch; absent when that single
    /// propagation failed (the failure is then listed in `failed_samples`).
    pub current_position: Option<PositionRecord>,
    pub future_positions: Vec<PositionRecord>,
    pub failed_samples: Vec<SampleFailureRecord>,
}

/// Structured failure payload for one satellite's pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct TrackFailure {
    pub kind: ErrorKind,
    pub error: String,
}

impl From<OrbitrackError> for TrackFailure {
    fn from(error: OrbitrackError) -> Self {
        TrackFailure {
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

/// Either a satellite track or the reason it could not be produced.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TrackOutcome {
    Tracked(SatelliteTrack),
    Failed(TrackFailure),
}

impl TrackOutcome {
    pub fn track(&self) -> Option<&SatelliteTrack> {
        match self {
            TrackOutcome::Tracked(track) => Some(track),
            TrackOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&TrackFailure> {
        match self {
            TrackOutcome::Tracked(_) => None,
            TrackOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Combined report for a dual-satellite request.
///
/// The two slots are computed independently; a failure in one never affects
/// the other.
#[derive(Debug, Clone, Serialize)]
pub struct DualTrackReport {
    pub sat1: TrackOutcome,
    pub sat2: TrackOutcome,
}

/// Satellite tracking façade.
pub struct Orbitrack {
    config: OrbitrackConfig,
    provider: Box<dyn TleProvider>,
}

impl Orbitrack {
    /// Construct a tracking context backed by the N2YO TLE source.
    pub fn new(config: OrbitrackConfig) -> Self {
        let provider = N2yoTleProvider::new(&config);
        Orbitrack {
            config,
            provider: Box::new(provider),
        }
    }

    /// Construct a tracking context with a custom TLE source.
    pub fn with_provider(config: OrbitrackConfig, provider: Box<dyn TleProvider>) -> Self {
        Orbitrack { config, provider }
    }

    /// Track one satellite starting now.
    ///
    /// See [`track_satellite_at`](Orbitrack::track_satellite_at).
    pub fn track_satellite(
        &self,
        norad_id: NoradId,
        horizon_minutes: u32,
        step_minutes: u32,
    ) -> Result<SatelliteTrack, OrbitrackError> {
        self.track_satellite_at(norad_id, Utc::now(), horizon_minutes, step_minutes)
    }

    /// Track one satellite from a given start epoch.
    ///
    /// Fetches the current TLE record, derives the orbital ellipse, and
    /// propagates the position at the start epoch plus one sample per step
    /// over the horizon. A propagation failure on a single step is recorded
    /// in `failed_samples` without discarding the rest of the track.
    ///
    /// Arguments
    /// -----------------
    /// * `norad_id`: satellite catalog number.
    /// * `start`: epoch of the "current" position sample.
    /// * `horizon_minutes`: look-ahead horizon; `horizon/step` future samples.
    /// * `step_minutes`: cadence between samples, at least 1.
    ///
    /// Return
    /// ----------
    /// * The [`SatelliteTrack`], or the first pipeline error (fetch, parse,
    ///   geometry, or propagator initialization).
    pub fn track_satellite_at(
        &self,
        norad_id: NoradId,
        start: DateTime<Utc>,
        horizon_minutes: u32,
        step_minutes: u32,
    ) -> Result<SatelliteTrack, OrbitrackError> {
        if step_minutes == 0 {
            return Err(OrbitrackError::InvalidSampling(
                "step_minutes must be at least 1".to_string(),
            ));
        }

        let record = self.provider.fetch_tle(norad_id)?;
        debug!(
            "satellite {norad_id}: fetched TLE{}",
            record
                .name
                .as_deref()
                .map(|name| format!(" for {name}"))
                .unwrap_or_default()
        );

        let elements = record.elements()?;
        let geometry = derive_geometry(&elements, &self.config)?;
        let propagator = Sgp4Propagator::from_record(&record)?;

        let tle_age_days = (start - propagator.epoch()).num_seconds() as f64 / 86_400.0;
        debug!("satellite {norad_id}: TLE is {tle_age_days:.1} days old");

        let future_steps = (horizon_minutes / step_minutes) as usize;
        let sampler = PositionSampler::new(
            &propagator,
            start,
            Duration::minutes(step_minutes as i64),
            future_steps + 1,
        )?;
        let track = sampler.collect_track();
        if !track.failures.is_empty() {
            warn!(
                "satellite {norad_id}: {} of {} samples failed to propagate",
                track.failures.len(),
                future_steps + 1
            );
        }

        let mut current_position = None;
        let mut future_positions = Vec::with_capacity(track.samples.len());
        for sample in &track.samples {
            if sample.epoch == start {
                current_position = Some(PositionRecord::from(sample));
            } else {
                future_positions.push(PositionRecord::from(sample));
            }
        }

        let failed_samples = track
            .failures
            .iter()
            .map(|failure| SampleFailureRecord {
                index: failure.index,
                epoch: failure.epoch,
                error: failure.error.to_string(),
            })
            .collect();

        info!(
            "satellite {norad_id}: tracked {} positions over {horizon_minutes} min",
            track.samples.len()
        );

        Ok(SatelliteTrack {
            norad_id,
            name: record.name,
            tle_epoch: propagator.epoch(),
            ellipse_equation: geometry.cartesian_equation(),
            geometry,
            current_position,
            future_positions,
            failed_samples,
        })
    }

    /// Current and future positions for two satellites, starting now, with
    /// the default 10-minute horizon at 1-minute steps.
    pub fn get_positions(&self, sat1: NoradId, sat2: NoradId) -> DualTrackReport {
        self.get_positions_at(
            sat1,
            sat2,
            Utc::now(),
            DEFAULT_HORIZON_MINUTES,
            DEFAULT_STEP_MINUTES,
        )
    }

    /// Dual-satellite report from a given start epoch.
    ///
    /// The two pipelines run independently: any error in one satellite's
    /// fetch/parse/propagation chain becomes a [`TrackFailure`] in its slot
    /// while the other proceeds normally. This method never returns an error
    /// and never panics on pipeline failures.
    pub fn get_positions_at(
        &self,
        sat1: NoradId,
        sat2: NoradId,
        start: DateTime<Utc>,
        horizon_minutes: u32,
        step_minutes: u32,
    ) -> DualTrackReport {
        let outcome = |norad_id| {
            match self.track_satellite_at(norad_id, start, horizon_minutes, step_minutes) {
                Ok(track) => TrackOutcome::Tracked(track),
                Err(error) => {
                    warn!("satellite {norad_id}: tracking failed: {error}");
                    TrackOutcome::Failed(TrackFailure::from(error))
                }
            }
        };

        DualTrackReport {
            sat1: outcome(sat1),
            sat2: outcome(sat2),
        }
    }

    /// Named variations of a satellite's current orbit.
    ///
    /// Fetches and parses the satellite's TLE, derives its geometry, and
    /// perturbs it into up to `count` labeled alternatives (see
    /// [`generate_variations`]).
    pub fn orbit_variations(
        &self,
        norad_id: NoradId,
        count: usize,
    ) -> Result<Vec<OrbitVariation>, OrbitrackError> {
        let record = self.provider.fetch_tle(norad_id)?;
        let elements = record.elements()?;
        let geometry = derive_geometry(&elements, &self.config)?;
        Ok(generate_variations(
            geometry.semi_major_axis_km,
            geometry.eccentricity,
            count,
            &self.config,
        ))
    }
}
