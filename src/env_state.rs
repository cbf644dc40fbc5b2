//! # Orbitrack environment state
//!
//! This module defines [`OrbitrackEnv`], the **shared environment object** used
//! across the `orbitrack` library. It wraps a persistent **HTTP client** used
//! for fetching two-line element records from the upstream ephemeris service.
//!
//! This object is designed to be **cheaply cloneable** and reused across
//! requests so HTTP sessions are not rebuilt per call.
//!
//! ## Notes
//!
//! - The agent applies a global timeout to every request; the upstream TLE
//!   service occasionally hangs and the pipeline must not block forever.
//! - Non-2xx statuses are returned to the caller rather than mapped to a
//!   transport error, so fetch failures can carry the upstream status code.

use std::time::Duration;

use ureq::Agent;

use crate::orbitrack_errors::OrbitrackError;

/// Shared HTTP state handed to the upstream TLE client.
#[derive(Debug, Clone)]
pub struct OrbitrackEnv {
    pub http_client: Agent,
}

impl OrbitrackEnv {
    /// Create a new environment with the given global HTTP timeout.
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();

        OrbitrackEnv { http_client: agent }
    }

    /// Perform a GET request and return the status code with the body text.
    ///
    /// Return
    /// ------
    /// * `(status, body)` on transport success, even for non-2xx statuses
    /// * [`OrbitrackError::UreqHttpError`] on connection or read failures
    pub(crate) fn get_from_url(&self, url: &str) -> Result<(u16, String), OrbitrackError> {
        let mut response = self.http_client.get(url).call()?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok((status, body))
    }
}
