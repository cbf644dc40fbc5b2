//! # Upstream TLE source
//!
//! Client for the N2YO REST API, the external collaborator that serves
//! current two-line element records by NORAD catalog number. The endpoint is
//! `GET {base}/tle/{norad_id}?apiKey={key}` and answers JSON with a `tle`
//! field holding the two newline-separated element lines.
//!
//! The HTTP call and the payload decoding are kept separate so the decoder
//! stays a pure function of the body text, testable without a network.
//!
//! The API key is supplied by the caller through
//! [`OrbitrackConfig`](crate::config::OrbitrackConfig); it is embedded in the
//! request URL, so the URL is never logged.

use log::debug;
use serde::Deserialize;

use crate::config::OrbitrackConfig;
use crate::constants::NoradId;
use crate::env_state::OrbitrackEnv;
use crate::orbitrack_errors::OrbitrackError;
use crate::tle::TleRecord;

/// How much of an upstream error body is kept in the error message.
const ERROR_BODY_LIMIT: usize = 200;

/// External collaborator seam: anything that can produce a TLE record for a
/// satellite.
pub trait TleProvider {
    fn fetch_tle(&self, norad_id: NoradId) -> Result<TleRecord, OrbitrackError>;
}

/// The `tle` endpoint response envelope.
#[derive(Debug, Deserialize)]
struct TleResponse {
    info: Option<TleResponseInfo>,
    tle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TleResponseInfo {
    satname: Option<String>,
}

/// N2YO-backed [`TleProvider`].
#[derive(Debug, Clone)]
pub struct N2yoTleProvider {
    env: OrbitrackEnv,
    base_url: String,
    api_key: String,
}

impl N2yoTleProvider {
    pub fn new(config: &OrbitrackConfig) -> Self {
        N2yoTleProvider {
            env: OrbitrackEnv::new(config.http_timeout),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

impl TleProvider for N2yoTleProvider {
    /// Fetch the current TLE record for one satellite.
    ///
    /// Return
    /// ----------
    /// * The decoded [`TleRecord`], or
    ///   [`OrbitrackError::UpstreamFetch`] for a non-2xx status,
    ///   [`OrbitrackError::TleMissing`] when the payload has no usable `tle`
    ///   field, and transport/decoding errors otherwise.
    fn fetch_tle(&self, norad_id: NoradId) -> Result<TleRecord, OrbitrackError> {
        debug!("fetching TLE for satellite {norad_id}");
        let url = format!("{}/tle/{}?apiKey={}", self.base_url, norad_id, self.api_key);
        let (status, body) = self.env.get_from_url(&url)?;

        if !(200..300).contains(&status) {
            let mut message = body;
            message.truncate(ERROR_BODY_LIMIT);
            return Err(OrbitrackError::UpstreamFetch { status, message });
        }

        decode_tle_response(norad_id, &body)
    }
}

/// Decode the `tle` endpoint body into a [`TleRecord`].
///
/// Pure function of its inputs; the two element lines are split on newlines
/// (carriage returns tolerated) and blank lines are skipped.
pub(crate) fn decode_tle_response(
    norad_id: NoradId,
    body: &str,
) -> Result<TleRecord, OrbitrackError> {
    let response: TleResponse = serde_json::from_str(body)?;

    let tle = response
        .tle
        .filter(|text| !text.trim().is_empty())
        .ok_or(OrbitrackError::TleMissing(norad_id))?;

    let mut lines = tle.lines().map(str::trim).filter(|line| !line.is_empty());
    let line1 = lines.next().ok_or(OrbitrackError::TleMissing(norad_id))?;
    let line2 = lines.next().ok_or(OrbitrackError::TleMissing(norad_id))?;

    Ok(TleRecord {
        norad_id,
        name: response.info.and_then(|info| info.satname),
        line1: line1.to_string(),
        line2: line2.to_string(),
    })
}
