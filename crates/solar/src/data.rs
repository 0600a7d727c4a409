//! Daily sunrise/sunset/twilight clock times and the sources that supply them.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracker_core::Observer;

use crate::spa::solar_position;

/// Apparent sunrise/sunset elevation including refraction and the solar semi-diameter.
pub const SUNRISE_ELEVATION_DEG: f64 = -0.833;
pub const CIVIL_TWILIGHT_DEG: f64 = -6.0;
pub const NAUTICAL_TWILIGHT_DEG: f64 = -12.0;

/// Local "HH:MM" clock times for one date, in the shape the solar-data API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarData {
    pub sunrise: String,
    pub sunset: String,
    pub civil_twilight_start: String,
    pub civil_twilight_end: String,
    pub nautical_twilight_start: String,
    pub nautical_twilight_end: String,
}

#[derive(Debug, Error)]
pub enum SolarError {
    #[error("solar data unavailable: {0}")]
    Unavailable(String),
    #[error("malformed {field} time `{value}`")]
    MalformedTime { field: &'static str, value: String },
    #[error("no {event} on {date} at this site")]
    NoEvent { event: &'static str, date: NaiveDate },
}

/// Anything that can produce the day's solar clock times for an observer.
pub trait SolarDataSource: Send + Sync {
    fn solar_data(&self, date: NaiveDate, observer: &Observer) -> Result<SolarData, SolarError>;
}

/// Which twilight window a local time falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TwilightWindow {
    MorningNautical,
    MorningCivil,
    EveningCivil,
    EveningNautical,
}

impl TwilightWindow {
    pub fn is_civil(self) -> bool {
        matches!(self, Self::MorningCivil | Self::EveningCivil)
    }
}

/// Parsed clock times for the twilight windows of one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwilightWindows {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub civil_start: NaiveTime,
    pub civil_end: NaiveTime,
    pub nautical_start: NaiveTime,
    pub nautical_end: NaiveTime,
}

impl TwilightWindows {
    pub fn from_solar_data(data: &SolarData) -> Result<Self, SolarError> {
        Ok(Self {
            sunrise: parse_clock("sunrise", &data.sunrise)?,
            sunset: parse_clock("sunset", &data.sunset)?,
            civil_start: parse_clock("civilTwilightStart", &data.civil_twilight_start)?,
            civil_end: parse_clock("civilTwilightEnd", &data.civil_twilight_end)?,
            nautical_start: parse_clock("nauticalTwilightStart", &data.nautical_twilight_start)?,
            nautical_end: parse_clock("nauticalTwilightEnd", &data.nautical_twilight_end)?,
        })
    }

    /// Morning window is nautical start..sunrise, evening is sunset..nautical end.
    pub fn classify(&self, local: NaiveTime) -> Option<TwilightWindow> {
        if local >= self.nautical_start && local < self.civil_start {
            Some(TwilightWindow::MorningNautical)
        } else if local >= self.civil_start && local < self.sunrise {
            Some(TwilightWindow::MorningCivil)
        } else if local > self.sunset && local <= self.civil_end {
            Some(TwilightWindow::EveningCivil)
        } else if local > self.civil_end && local <= self.nautical_end {
            Some(TwilightWindow::EveningNautical)
        } else {
            None
        }
    }
}

fn parse_clock(field: &'static str, value: &str) -> Result<NaiveTime, SolarError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| SolarError::MalformedTime {
            field,
            value: value.to_string(),
        })
}

/// Derives the day's solar clock times from the solar position algorithm alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatedSolarData;

impl SolarDataSource for CalculatedSolarData {
    fn solar_data(&self, date: NaiveDate, observer: &Observer) -> Result<SolarData, SolarError> {
        let midnight = observer.local_time.local_midnight(date);
        let elevations: Vec<(chrono::DateTime<chrono::Utc>, f64)> = (0..=1_440)
            .map(|minute| {
                let instant = midnight + Duration::minutes(minute);
                (instant, solar_position(instant, observer).elevation)
            })
            .collect();

        let crossing = |event: &'static str, threshold: f64, rising: bool| {
            elevations
                .windows(2)
                .find(|pair| {
                    let (before, after) = (pair[0].1, pair[1].1);
                    if rising {
                        before < threshold && after >= threshold
                    } else {
                        before >= threshold && after < threshold
                    }
                })
                .map(|pair| {
                    observer
                        .local_time
                        .to_local(pair[1].0)
                        .format("%H:%M")
                        .to_string()
                })
                .ok_or(SolarError::NoEvent { event, date })
        };

        Ok(SolarData {
            sunrise: crossing("sunrise", SUNRISE_ELEVATION_DEG, true)?,
            sunset: crossing("sunset", SUNRISE_ELEVATION_DEG, false)?,
            civil_twilight_start: crossing("civil dawn", CIVIL_TWILIGHT_DEG, true)?,
            civil_twilight_end: crossing("civil dusk", CIVIL_TWILIGHT_DEG, false)?,
            nautical_twilight_start: crossing("nautical dawn", NAUTICAL_TWILIGHT_DEG, true)?,
            nautical_twilight_end: crossing("nautical dusk", NAUTICAL_TWILIGHT_DEG, false)?,
        })
    }
}
