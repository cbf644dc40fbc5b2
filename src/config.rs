//! Tracking configuration.
//!
//! Everything tunable about a tracking context lives in
//! [`OrbitrackConfig`]: the upstream TLE endpoint and its credential, the
//! gravitational model, and the orbit safety margins. The structure is built
//! by the caller and handed to [`Orbitrack::new`](crate::orbitrack::Orbitrack::new)
//! at construction time; nothing in the library reads credentials from the
//! environment or from module-level globals.

use std::time::Duration;

use crate::constants::{EARTH_RADIUS_KM, MIN_SAFE_ALTITUDE_KM, MU_EARTH};

/// Configuration for a tracking context.
///
/// Units:
/// * `mu_km3_s2`: km³/s²
/// * `earth_radius_km`, `min_safe_altitude_km`: km
#[derive(Debug, Clone)]
pub struct OrbitrackConfig {
    /// Base URL of the upstream TLE REST service, without a trailing slash.
    pub api_base_url: String,
    /// Caller-supplied API key for the upstream TLE service.
    pub api_key: String,
    /// Gravitational parameter of the central body.
    pub mu_km3_s2: f64,
    /// Equatorial radius of the central body.
    pub earth_radius_km: f64,
    /// Minimum survivable altitude above the equatorial radius.
    pub min_safe_altitude_km: f64,
    /// Global timeout applied to upstream HTTP requests.
    pub http_timeout: Duration,
}

impl OrbitrackConfig {
    /// Build a configuration with physical defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        OrbitrackConfig {
            api_base_url: "https://api.n2yo.com/rest/v1/satellite".to_string(),
            api_key: api_key.into(),
            mu_km3_s2: MU_EARTH,
            earth_radius_km: EARTH_RADIUS_KM,
            min_safe_altitude_km: MIN_SAFE_ALTITUDE_KM,
            http_timeout: Duration::from_secs(10),
        }
    }

    /// Lowest acceptable periapsis radius, measured from the body center.
    pub fn periapsis_floor_km(&self) -> f64 {
        self.earth_radius_km + self.min_safe_altitude_km
    }
}

impl Default for OrbitrackConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}
