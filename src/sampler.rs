//! # Position sampling
//!
//! [`PositionSampler`] turns a propagator into a finite, lazy, restartable
//! sequence of positions at a fixed cadence: sample `i` is taken at
//! `start + i·step` for `i` in `[0, count)`, so the first element is always
//! the position at the start epoch itself. Each element costs exactly one
//! propagator evaluation.
//!
//! A failing step does not abort the sequence: the iterator yields the error
//! in place, and [`PositionSampler::collect_track`] splits the outcome into
//! the successful samples and the failed indices.

use chrono::{DateTime, Duration, Utc};

use crate::orbitrack_errors::OrbitrackError;
use crate::propagator::{Propagate, PositionSample};

/// Fixed-cadence sampling plan over a propagator.
pub struct PositionSampler<'a> {
    propagator: &'a dyn Propagate,
    start: DateTime<Utc>,
    step: Duration,
    count: usize,
}

/// A failed sampling step, recorded alongside its neighbors.
#[derive(Debug)]
pub struct SampleFailure {
    pub index: usize,
    pub epoch: DateTime<Utc>,
    pub error: OrbitrackError,
}

/// Aggregated outcome of a full sampling pass.
///
/// `samples.len() + failures.len()` always equals the requested count, and
/// both lists are in increasing time order.
#[derive(Debug, Default)]
pub struct SampledTrack {
    pub samples: Vec<PositionSample>,
    pub failures: Vec<SampleFailure>,
}

impl<'a> PositionSampler<'a> {
    /// Build a sampling plan.
    ///
    /// Arguments
    /// -----------------
    /// * `propagator`: position source evaluated once per step.
    /// * `start`: epoch of sample 0.
    /// * `step`: strictly positive cadence between consecutive samples.
    /// * `count`: number of samples, at least 1.
    pub fn new(
        propagator: &'a dyn Propagate,
        start: DateTime<Utc>,
        step: Duration,
        count: usize,
    ) -> Result<Self, OrbitrackError> {
        if step <= Duration::zero() {
            return Err(OrbitrackError::InvalidSampling(format!(
                "step must be positive, got {step}"
            )));
        }
        if count == 0 {
            return Err(OrbitrackError::InvalidSampling(
                "count must be at least 1".to_string(),
            ));
        }
        Ok(PositionSampler {
            propagator,
            start,
            step,
            count,
        })
    }

    /// Start (or restart) a lazy pass over the sampling plan.
    pub fn iter(&self) -> SampleIter<'a, '_> {
        SampleIter {
            sampler: self,
            index: 0,
        }
    }

    /// Run the whole plan, partitioning successes from failures.
    pub fn collect_track(&self) -> SampledTrack {
        let mut track = SampledTrack::default();
        for (index, outcome) in self.iter().enumerate() {
            match outcome {
                Ok(sample) => track.samples.push(sample),
                Err(error) => track.failures.push(SampleFailure {
                    index,
                    epoch: self.start + self.step * index as i32,
                    error,
                }),
            }
        }
        track
    }
}

/// Lazy iterator over a [`PositionSampler`] plan.
pub struct SampleIter<'a, 'b> {
    sampler: &'b PositionSampler<'a>,
    index: usize,
}

impl Iterator for SampleIter<'_, '_> {
    type Item = Result<PositionSample, OrbitrackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.sampler.count {
            return None;
        }
        let epoch = self.sampler.start + self.sampler.step * self.index as i32;
        self.index += 1;
        Some(self.sampler.propagator.position_at(epoch))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sampler.count - self.index;
        (remaining, Some(remaining))
    }
}
