//! Geographic points and the fixed ground observer.

use serde::{Deserialize, Serialize};

use crate::constants::{BERMUDA_LATITUDE, BERMUDA_LONGITUDE};
use crate::time::LocalTimeRule;

/// Latitude/longitude pair in degrees (north and east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Ground site from which launches are watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Observer {
    pub name: String,
    pub location: GeoPoint,
    /// Height above mean sea level (m), used for topocentric solar parallax.
    pub elevation_m: f64,
    pub local_time: LocalTimeRule,
}

impl Observer {
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            location,
            elevation_m: 0.0,
            local_time: LocalTimeRule::default(),
        }
    }

    pub fn bermuda() -> Self {
        Self::new("Bermuda", GeoPoint::new(BERMUDA_LATITUDE, BERMUDA_LONGITUDE))
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::bermuda()
    }
}
