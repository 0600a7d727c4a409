//! Launch record as consumed from the upstream launch-tracking API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::GeoPoint;
use crate::time::parse_utc;

/// Subset of a Launch Library 2 launch used by the visibility pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub id: String,
    pub name: String,
    /// Scheduled liftoff ("No Earlier Than"), ISO-8601 UTC.
    #[serde(default)]
    pub net: String,
    #[serde(default)]
    pub mission: Option<Mission>,
    #[serde(default)]
    pub pad: Option<Pad>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub orbit: Option<Orbit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
}

impl LaunchRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, net: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            net: net.to_rfc3339_opts(SecondsFormat::Secs, true),
            mission: None,
            pad: None,
        }
    }

    pub fn with_mission(mut self, name: impl Into<String>, orbit: Option<&str>) -> Self {
        self.mission = Some(Mission {
            name: name.into(),
            orbit: orbit.map(|name| Orbit {
                name: name.to_string(),
            }),
        });
        self
    }

    pub fn with_pad(mut self, name: impl Into<String>, location: GeoPoint) -> Self {
        self.pad = Some(Pad {
            name: name.into(),
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
            location: None,
        });
        self
    }

    /// Same launch rescheduled to `net`.
    pub fn with_net(&self, net: DateTime<Utc>) -> Self {
        let mut moved = self.clone();
        moved.net = net.to_rfc3339_opts(SecondsFormat::Secs, true);
        moved
    }

    /// Liftoff instant, or `None` when `net` is absent or unparsable.
    pub fn liftoff_time(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.net)
    }

    /// Pad coordinates, falling back to the pad's location record.
    pub fn pad_coordinates(&self) -> Option<GeoPoint> {
        let pad = self.pad.as_ref()?;
        let direct = pad
            .latitude
            .zip(pad.longitude)
            .map(|(lat, lon)| GeoPoint::new(lat, lon))
            .filter(GeoPoint::is_valid);
        direct.or_else(|| {
            let location = pad.location.as_ref()?;
            location
                .latitude
                .zip(location.longitude)
                .map(|(lat, lon)| GeoPoint::new(lat, lon))
                .filter(GeoPoint::is_valid)
        })
    }

    pub fn mission_name(&self) -> &str {
        self.mission
            .as_ref()
            .map(|m| m.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn orbit_name(&self) -> Option<&str> {
        self.mission
            .as_ref()
            .and_then(|m| m.orbit.as_ref())
            .map(|o| o.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    /// Lower-cased launch name, mission name and orbit name for keyword matching.
    pub fn search_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        if let Some(mission) = &self.mission {
            text.push(' ');
            text.push_str(&mission.name.to_lowercase());
        }
        if let Some(orbit) = self.orbit_name() {
            text.push(' ');
            text.push_str(&orbit.to_lowercase());
        }
        text
    }
}

/// Accept coordinates as JSON numbers or numeric strings; anything else is absent.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(v)) => Some(v),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Raw::Other(_)) | None => None,
    }
    .filter(|v| v.is_finite()))
}
