//! Simplified Solar Position Algorithm.
//!
//! Follows the NREL SPA step sequence with truncated periodic-term tables and
//! the low-precision four-term nutation model. Atmospheric refraction is not
//! applied; the elevation is the topocentric geometric elevation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::constants::{JD_J2000, SECONDS_PER_DAY};
use tracker_core::time::julian_day;
use tracker_core::units::normalize_degrees;
use tracker_core::{GeoPoint, Observer};

/// TT − UT used for the dynamical-time correction (s).
const DELTA_T_SECONDS: f64 = 69.0;
/// Equatorial Earth radius used by the parallax correction (m).
const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_140.0;
/// Polar/equatorial axis ratio.
const EARTH_AXIS_RATIO: f64 = 0.996_647_19;

/// Sun position for one instant and observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPosition {
    /// Degrees clockwise from north, [0, 360).
    pub azimuth: f64,
    /// Degrees above the horizon, negative below.
    pub elevation: f64,
    /// Topocentric declination (deg).
    pub declination: f64,
    /// Topocentric right ascension (deg).
    pub right_ascension: f64,
    pub julian_day: f64,
    /// Apparent minus mean solar time (minutes).
    pub equation_of_time: f64,
    pub computed_at: DateTime<Utc>,
}

// Earth heliocentric longitude terms [A, B, C]: A·cos(B + C·JME).
const L0: &[[f64; 3]] = &[
    [175_347_046.0, 0.0, 0.0],
    [3_341_656.0, 4.669_256_8, 6_283.075_85],
    [34_894.0, 4.6261, 12_566.1517],
    [3_497.0, 2.7441, 5_753.3849],
    [3_418.0, 2.8289, 3.5231],
    [3_136.0, 3.6277, 77_713.7715],
    [2_676.0, 4.4181, 7_860.4194],
    [2_343.0, 6.1352, 3_930.2097],
    [1_324.0, 0.7425, 11_506.7698],
    [1_273.0, 2.0371, 529.691],
    [1_199.0, 1.1096, 1_577.3435],
    [990.0, 5.233, 5_884.927],
    [902.0, 2.045, 26.298],
    [857.0, 3.508, 398.149],
    [780.0, 1.179, 5_223.694],
    [753.0, 2.533, 5_507.553],
    [505.0, 4.583, 18_849.228],
    [492.0, 4.205, 775.523],
    [357.0, 2.92, 0.067],
    [317.0, 5.849, 11_790.629],
    [284.0, 1.899, 796.298],
    [271.0, 0.315, 10_977.079],
    [243.0, 0.345, 5_486.778],
    [206.0, 4.806, 2_544.314],
    [205.0, 1.869, 5_573.143],
];
const L1: &[[f64; 3]] = &[
    [628_331_966_747.0, 0.0, 0.0],
    [206_059.0, 2.678_235, 6_283.075_85],
    [4_303.0, 2.6351, 12_566.1517],
    [425.0, 1.59, 3.523],
    [119.0, 5.796, 26.298],
    [109.0, 2.966, 1_577.344],
    [93.0, 2.59, 18_849.23],
    [72.0, 1.14, 529.69],
    [68.0, 1.87, 398.15],
    [67.0, 4.41, 5_507.55],
];
const L2: &[[f64; 3]] = &[
    [52_919.0, 0.0, 0.0],
    [8_720.0, 1.0721, 6_283.0758],
    [309.0, 0.867, 12_566.152],
    [27.0, 0.05, 3.52],
    [16.0, 5.19, 26.3],
    [16.0, 3.68, 155.42],
];
const L3: &[[f64; 3]] = &[
    [289.0, 5.844, 6_283.076],
    [35.0, 0.0, 0.0],
    [17.0, 5.49, 12_566.15],
];
const L4: &[[f64; 3]] = &[[114.0, 3.142, 0.0], [8.0, 4.13, 6_283.08]];
const L5: &[[f64; 3]] = &[[1.0, 3.14, 0.0]];

const B0: &[[f64; 3]] = &[
    [280.0, 3.199, 84_334.662],
    [102.0, 5.422, 5_507.553],
    [80.0, 3.88, 5_223.69],
    [44.0, 3.7, 2_352.87],
    [32.0, 4.0, 1_577.34],
];
const B1: &[[f64; 3]] = &[[9.0, 3.9, 5_507.55], [6.0, 1.73, 5_223.69]];

const R0: &[[f64; 3]] = &[
    [100_013_989.0, 0.0, 0.0],
    [1_670_700.0, 3.098_463_5, 6_283.075_85],
    [13_956.0, 3.055_25, 12_566.1517],
    [3_084.0, 5.1985, 77_713.7715],
    [1_628.0, 1.1739, 5_753.3849],
    [1_576.0, 2.8469, 7_860.4194],
    [925.0, 5.453, 11_506.77],
    [542.0, 4.564, 3_930.21],
    [472.0, 3.661, 5_884.927],
    [346.0, 0.964, 5_507.553],
];
const R1: &[[f64; 3]] = &[
    [103_019.0, 1.107_49, 6_283.075_85],
    [1_721.0, 1.0644, 12_566.1517],
    [702.0, 3.142, 0.0],
];
const R2: &[[f64; 3]] = &[[4_359.0, 5.7846, 6_283.0758], [124.0, 5.579, 12_566.152]];
const R3: &[[f64; 3]] = &[[145.0, 4.273, 6_283.076]];

/// Sun position seen by `observer` at `instant`.
pub fn solar_position(instant: DateTime<Utc>, observer: &Observer) -> SolarPosition {
    solar_position_at(instant, observer.location, observer.elevation_m)
}

/// Sun position for an arbitrary site. Pure function of its inputs.
pub fn solar_position_at(
    instant: DateTime<Utc>,
    location: GeoPoint,
    elevation_m: f64,
) -> SolarPosition {
    let jd = julian_day(instant);
    let jde = jd + DELTA_T_SECONDS / SECONDS_PER_DAY;
    let jc = (jd - JD_J2000) / 36_525.0;
    let jce = (jde - JD_J2000) / 36_525.0;
    let jme = jce / 10.0;

    // Earth heliocentric coordinates.
    let l = normalize_degrees(periodic_sum(&[L0, L1, L2, L3, L4, L5], jme).to_degrees());
    let b = periodic_sum(&[B0, B1], jme).to_degrees();
    let r = periodic_sum(&[R0, R1, R2, R3], jme);

    // Geocentric ecliptic coordinates.
    let theta = normalize_degrees(l + 180.0);
    let beta = -b;

    let (delta_psi, delta_epsilon) = nutation(jce);
    let epsilon = mean_obliquity_arcsec(jme) / 3_600.0 + delta_epsilon;

    let aberration = -20.4898 / (3_600.0 * r);
    let lambda = theta + delta_psi + aberration;

    let nu0 = normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd - JD_J2000) + 0.000_387_933 * jc * jc
            - jc * jc * jc / 38_710_000.0,
    );
    let nu = nu0 + delta_psi * epsilon.to_radians().cos();

    let (alpha, delta) = equatorial(lambda, beta, epsilon);
    let hour_angle = normalize_degrees(nu + location.longitude - alpha);

    let topo = topocentric(alpha, delta, hour_angle, r, location.latitude, elevation_m);

    let phi = location.latitude.to_radians();
    let delta_p = topo.declination.to_radians();
    let h_p = topo.hour_angle.to_radians();
    let elevation = (phi.sin() * delta_p.sin() + phi.cos() * delta_p.cos() * h_p.cos())
        .asin()
        .to_degrees();
    let gamma = h_p
        .sin()
        .atan2(h_p.cos() * phi.sin() - delta_p.tan() * phi.cos())
        .to_degrees();
    let azimuth = normalize_degrees(gamma + 180.0);

    SolarPosition {
        azimuth,
        elevation,
        declination: topo.declination,
        right_ascension: topo.right_ascension,
        julian_day: jd,
        equation_of_time: equation_of_time(jme, alpha, delta_psi, epsilon),
        computed_at: instant,
    }
}

fn periodic_sum(series: &[&[[f64; 3]]], jme: f64) -> f64 {
    series
        .iter()
        .enumerate()
        .map(|(power, terms)| {
            let sum: f64 = terms.iter().map(|[a, b, c]| a * (b + c * jme).cos()).sum();
            sum * jme.powi(power as i32)
        })
        .sum::<f64>()
        / 1.0e8
}

/// Nutation in longitude and obliquity (deg), four leading terms.
fn nutation(jce: f64) -> (f64, f64) {
    let omega = (125.044_52 - 1_934.136_261 * jce).to_radians();
    let l_sun = (280.4665 + 36_000.7698 * jce).to_radians();
    let l_moon = (218.3165 + 481_267.8813 * jce).to_radians();

    let delta_psi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let delta_epsilon = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos()
        + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();
    (delta_psi / 3_600.0, delta_epsilon / 3_600.0)
}

fn mean_obliquity_arcsec(jme: f64) -> f64 {
    const COEFFS: [f64; 11] = [
        84_381.448, -4_680.93, -1.55, 1_999.25, -51.38, -249.67, -39.05, 7.12, 27.87, 5.79, 2.45,
    ];
    let u = jme / 10.0;
    COEFFS.iter().rev().fold(0.0, |acc, c| acc * u + c)
}

/// Apparent right ascension and declination (deg).
fn equatorial(lambda: f64, beta: f64, epsilon: f64) -> (f64, f64) {
    let lambda = lambda.to_radians();
    let beta = beta.to_radians();
    let epsilon = epsilon.to_radians();

    let alpha = (lambda.sin() * epsilon.cos() - beta.tan() * epsilon.sin()).atan2(lambda.cos());
    let delta = (beta.sin() * epsilon.cos() + beta.cos() * epsilon.sin() * lambda.sin()).asin();
    (normalize_degrees(alpha.to_degrees()), delta.to_degrees())
}

struct Topocentric {
    right_ascension: f64,
    declination: f64,
    hour_angle: f64,
}

fn topocentric(
    alpha: f64,
    delta: f64,
    hour_angle: f64,
    earth_sun_au: f64,
    latitude: f64,
    elevation_m: f64,
) -> Topocentric {
    let xi = (8.794 / (3_600.0 * earth_sun_au)).to_radians();
    let phi = latitude.to_radians();
    let delta = delta.to_radians();
    let h = hour_angle.to_radians();

    let u = (EARTH_AXIS_RATIO * phi.tan()).atan();
    let x = u.cos() + elevation_m / EARTH_EQUATORIAL_RADIUS_M * phi.cos();
    let y = EARTH_AXIS_RATIO * u.sin() + elevation_m / EARTH_EQUATORIAL_RADIUS_M * phi.sin();

    let denom = delta.cos() - x * xi.sin() * h.cos();
    let delta_alpha = (-x * xi.sin() * h.sin()).atan2(denom);
    let delta_prime = ((delta.sin() - y * xi.sin()) * delta_alpha.cos()).atan2(denom);

    Topocentric {
        right_ascension: normalize_degrees(alpha + delta_alpha.to_degrees()),
        declination: delta_prime.to_degrees(),
        hour_angle: hour_angle - delta_alpha.to_degrees(),
    }
}

/// Equation of time in minutes, wrapped into ±20 min.
fn equation_of_time(jme: f64, alpha: f64, delta_psi: f64, epsilon: f64) -> f64 {
    let m = normalize_degrees(
        280.466_456_7 + 360_007.698_277_9 * jme + 0.030_320_28 * jme.powi(2)
            + jme.powi(3) / 49_931.0
            - jme.powi(4) / 15_300.0
            - jme.powi(5) / 2_000_000.0,
    );
    let e = m - 0.005_718_3 - alpha + delta_psi * epsilon.to_radians().cos();
    let minutes = normalize_degrees(e) * 4.0;
    if minutes > 20.0 { minutes - 1_440.0 } else { minutes }
}
