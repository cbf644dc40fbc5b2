use std::collections::HashMap;

use chrono::{DateTime, Utc};
use orbitrack::constants::NoradId;
use orbitrack::n2yo::TleProvider;
use orbitrack::orbitrack_errors::OrbitrackError;
use orbitrack::tle::TleRecord;

pub const ISS_NORAD_ID: NoradId = 25544;
pub const ISS_LINE1: &str = "1 25544U 98067A   20148.21301450  .00001715  00000-0  38778-4 0  9992";
pub const ISS_LINE2: &str = "2 25544  51.6435  92.2789 0002570 358.0648 144.9972 15.49396855228767";

pub fn iss_record() -> TleRecord {
    TleRecord {
        norad_id: ISS_NORAD_ID,
        name: Some("SPACE STATION".to_string()),
        line1: ISS_LINE1.to_string(),
        line2: ISS_LINE2.to_string(),
    }
}

/// Start epoch matching the ISS record's own epoch (2020-05-27T05:06:44Z).
pub fn iss_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_590_556_004, 0).unwrap()
}

/// Canned upstream responses keyed by catalog number.
pub enum StubResponse {
    Record(TleRecord),
    HttpStatus(u16),
    MissingTle,
}

/// Hermetic [`TleProvider`] for facade tests.
#[derive(Default)]
pub struct StubTleProvider {
    responses: HashMap<NoradId, StubResponse>,
}

impl StubTleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: TleRecord) -> Self {
        self.responses
            .insert(record.norad_id, StubResponse::Record(record));
        self
    }

    pub fn with_status(mut self, norad_id: NoradId, status: u16) -> Self {
        self.responses
            .insert(norad_id, StubResponse::HttpStatus(status));
        self
    }

    pub fn with_missing_tle(mut self, norad_id: NoradId) -> Self {
        self.responses.insert(norad_id, StubResponse::MissingTle);
        self
    }
}

impl TleProvider for StubTleProvider {
    fn fetch_tle(&self, norad_id: NoradId) -> Result<TleRecord, OrbitrackError> {
        match self.responses.get(&norad_id) {
            Some(StubResponse::Record(record)) => Ok(record.clone()),
            Some(StubResponse::HttpStatus(status)) => Err(OrbitrackError::UpstreamFetch {
                status: *status,
                message: "Not Found".to_string(),
            }),
            Some(StubResponse::MissingTle) | None => Err(OrbitrackError::TleMissing(norad_id)),
        }
    }
}
