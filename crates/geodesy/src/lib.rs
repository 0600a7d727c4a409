//! Spherical-Earth geometry: great-circle distance, bearing, forward projection,
//! and the curvature-corrected elevation angle of an object seen from the ground.
//!
//! Every formula uses the same 6371 km sphere. NaN inputs propagate; nothing here
//! guards against them.
use serde::{Deserialize, Serialize};
use tracker_core::constants::EARTH_RADIUS_KM;
use tracker_core::units::{m_to_km, normalize_degrees};
use tracker_core::GeoPoint;

/// Haversine great-circle distance between two points (km).
pub fn distance_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_lat = (p2.latitude - p1.latitude).to_radians();
    let d_lon = (p2.longitude - p1.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Initial bearing from `from` to `to`, degrees clockwise from north in [0, 360).
pub fn bearing_degrees(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_km` along the great circle leaving
/// `origin` on `bearing_deg`. Longitude is wrapped into [-180, 180).
pub fn destination_point(origin: GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let lon_deg = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(lat2.to_degrees(), lon_deg)
}

/// Apparent elevation of an object `distance_km` away along the ground at
/// `altitude_m`, after dropping the altitude by the curvature sag `d²/2R`.
///
/// A 200 km object 2000 km away sits below the horizon (the sag is ~314 km),
/// even though a flat-earth `atan(200/2000)` would put it at ~5.7°.
pub fn elevation_angle_degrees(distance_km: f64, altitude_m: f64) -> f64 {
    let curvature_drop_km = distance_km * distance_km / (2.0 * EARTH_RADIUS_KM);
    let adjusted_altitude_km = m_to_km(altitude_m) - curvature_drop_km;
    adjusted_altitude_km.atan2(distance_km).to_degrees()
}

/// Distance, bearing and elevation of an airborne point as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookAngles {
    pub distance_km: f64,
    pub bearing_deg: f64,
    pub elevation_deg: f64,
}

/// Look angles from `observer` to `point` at `altitude_m`.
pub fn look_angles(observer: GeoPoint, point: GeoPoint, altitude_m: f64) -> LookAngles {
    let distance = distance_km(observer, point);
    LookAngles {
        distance_km: distance,
        bearing_deg: bearing_degrees(observer, point),
        elevation_deg: elevation_angle_degrees(distance, altitude_m),
    }
}
