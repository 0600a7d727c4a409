//! Blocking HTTP clients for the upstream data the tracker consumes:
//! FlightClub-style telemetry simulations and daily solar clock times.
//! Trajectory-graphic hints are read from a local file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use tracker_config::SourcesConfig;
use tracker_core::{LaunchRecord, Observer};
use tracker_solar::{SolarData, SolarDataSource, SolarError};
use tracker_trajectory::{
    DirectionHint, MissionMatch, SimulationData, SourceError, StaticDirectionHints, TelemetrySource,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read hints file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ImportError> for SourceError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Network(e) => SourceError::Request(e.to_string()),
            ImportError::Status(code) => SourceError::Status(code),
            ImportError::Decode(e) => SourceError::Payload(e.to_string()),
            ImportError::Yaml(e) => SourceError::Payload(e.to_string()),
            ImportError::Io(e) => SourceError::Request(e.to_string()),
        }
    }
}

impl From<ImportError> for SolarError {
    fn from(err: ImportError) -> Self {
        SolarError::Unavailable(err.to_string())
    }
}

/// Shared client honouring the configured timeout and user agent.
pub fn build_client(sources: &SourcesConfig) -> Result<Client, ImportError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(sources.timeout_secs))
        .user_agent(sources.user_agent.clone())
        .build()?)
}

/// GET and decode JSON; a 404 is an absent resource rather than an error.
fn get_json<T: DeserializeOwned>(
    request: reqwest::blocking::RequestBuilder,
) -> Result<Option<T>, ImportError> {
    let response = request.send()?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ImportError::Status(status.as_u16()));
    }
    let body = response.text()?;
    Ok(Some(serde_json::from_str(&body)?))
}

/// Telemetry simulations looked up by Launch Library id.
#[derive(Debug, Clone)]
pub struct FlightClubClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FlightClubClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Client for the configured endpoint, or `None` when telemetry is not configured.
    pub fn from_config(sources: &SourcesConfig) -> Result<Option<Self>, ImportError> {
        let Some(base_url) = &sources.flightclub_base_url else {
            return Ok(None);
        };
        let client = build_client(sources)?;
        Ok(Some(Self::new(
            client,
            base_url.clone(),
            sources.flightclub_api_key.clone(),
        )))
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header("X-Api-Key", key),
            None => request,
        }
    }
}

impl TelemetrySource for FlightClubClient {
    fn match_mission(&self, launch: &LaunchRecord) -> Result<Option<MissionMatch>, SourceError> {
        let url = format!("{}/missions", self.base_url);
        debug!(%url, launch = %launch.id, "matching telemetry mission");
        let matches: Option<Vec<MissionMatch>> =
            get_json(self.get(&url).query(&[("launchLibraryId", launch.id.as_str())]))?;
        Ok(matches.and_then(|m| m.into_iter().next()))
    }

    fn fetch_simulation(&self, sim_id: &str) -> Result<SimulationData, SourceError> {
        let url = format!("{}/simulations/{sim_id}", self.base_url);
        info!(%url, "fetching telemetry simulation");
        get_json(self.get(&url))?.ok_or(SourceError::Status(StatusCode::NOT_FOUND.as_u16()))
    }
}

/// Daily sunrise/sunset/twilight times from a solar-data web service.
#[derive(Debug, Clone)]
pub struct SolarApiClient {
    client: Client,
    base_url: String,
}

/// Some services wrap the times in a `results` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SolarPayload {
    Wrapped { results: SolarData },
    Bare(SolarData),
}

impl SolarApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(sources: &SourcesConfig) -> Result<Option<Self>, ImportError> {
        let Some(base_url) = &sources.solar_api_base_url else {
            return Ok(None);
        };
        Ok(Some(Self::new(build_client(sources)?, base_url.clone())))
    }
}

impl SolarDataSource for SolarApiClient {
    fn solar_data(&self, date: NaiveDate, observer: &Observer) -> Result<SolarData, SolarError> {
        let date_param = date.format("%Y-%m-%d").to_string();
        let lat = observer.location.latitude.to_string();
        let lng = observer.location.longitude.to_string();
        debug!(url = %self.base_url, date = %date_param, "fetching solar data");
        let request = self.client.get(&self.base_url).query(&[
            ("lat", lat.as_str()),
            ("lng", lng.as_str()),
            ("date", date_param.as_str()),
        ]);
        match get_json::<SolarPayload>(request)? {
            Some(SolarPayload::Wrapped { results }) | Some(SolarPayload::Bare(results)) => {
                Ok(results)
            }
            None => Err(SolarError::Unavailable(format!(
                "no solar data for {date_param}"
            ))),
        }
    }
}

/// Load trajectory-graphic hints keyed by launch id. `.json` files are read
/// as JSON, anything else as YAML.
pub fn load_direction_hints<P: AsRef<Path>>(path: P) -> Result<StaticDirectionHints, ImportError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let hints: HashMap<String, DirectionHint> =
        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
    info!(path = %path.display(), count = hints.len(), "loaded direction hints");
    Ok(StaticDirectionHints::from(hints))
}

/// Hints from `sources.direction_hints_path`, or `None` when not configured.
pub fn direction_hints_from_config(
    sources: &SourcesConfig,
) -> Result<Option<StaticDirectionHints>, ImportError> {
    sources
        .direction_hints_path
        .as_ref()
        .map(load_direction_hints)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_payload_accepts_wrapped_and_bare_shapes() {
        let times = r#"{"sunrise":"06:58","sunset":"17:18","civilTwilightStart":"06:32",
            "civilTwilightEnd":"17:44","nauticalTwilightStart":"06:02","nauticalTwilightEnd":"18:14"}"#;
        let wrapped: SolarPayload =
            serde_json::from_str(&format!(r#"{{"results":{times}}}"#)).unwrap();
        let bare: SolarPayload = serde_json::from_str(times).unwrap();
        match (wrapped, bare) {
            (SolarPayload::Wrapped { results: a }, SolarPayload::Bare(b)) => assert_eq!(a, b),
            _ => panic!("payload shapes misread"),
        }
    }

    #[test]
    fn mission_match_reads_either_id_field() {
        let a: MissionMatch = serde_json::from_str(r#"{"flightClubSimId":"abc"}"#).unwrap();
        let b: MissionMatch = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unconfigured_sources_build_no_clients() {
        let sources = SourcesConfig::default();
        assert!(FlightClubClient::from_config(&sources).unwrap().is_none());
        assert!(SolarApiClient::from_config(&sources).unwrap().is_none());
        assert!(direction_hints_from_config(&sources).unwrap().is_none());
    }

    #[test]
    fn missing_hints_file_is_an_io_error() {
        let err = load_direction_hints("data/no-such-hints.yaml").unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }

    #[test]
    fn import_errors_map_onto_tier_errors() {
        let err: SourceError = ImportError::Status(503).into();
        assert!(matches!(err, SourceError::Status(503)));
        let err: SolarError = ImportError::Status(404).into();
        assert!(err.to_string().contains("404"));
    }
}
