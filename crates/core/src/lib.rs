//! Core units, constants, and shared primitives for the Bermuda rocket tracker workspace.

pub mod compass;
pub mod geo;
pub mod launch;

pub use compass::CompassDirection;
pub use geo::{GeoPoint, Observer};
pub use launch::{LaunchRecord, Location, Mission, Orbit, Pad};

/// Physical constants expressed in the units noted on each item.
pub mod constants {
    /// Mean Earth radius used by every spherical-Earth formula (km).
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;
    /// Mean Earth radius in metres.
    pub const EARTH_RADIUS_M: f64 = EARTH_RADIUS_KM * 1_000.0;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Julian day of the Unix epoch (1970-01-01T00:00:00Z).
    pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;
    /// Julian day of J2000.0.
    pub const JD_J2000: f64 = 2_451_545.0;
    /// Default observer: Bermuda (degrees).
    pub const BERMUDA_LATITUDE: f64 = 32.3078;
    pub const BERMUDA_LONGITUDE: f64 = -64.7505;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Wrap an angle in degrees into [0, 360).
    #[inline]
    pub fn normalize_degrees(v: f64) -> f64 {
        let wrapped = v.rem_euclid(360.0);
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }
}

/// Time helpers shared across crates: Julian days and observer-local civil time.
pub mod time {
    use chrono::{
        DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset,
        TimeZone, Utc, Weekday,
    };
    use serde::{Deserialize, Serialize};

    use super::constants::{JD_UNIX_EPOCH, SECONDS_PER_DAY};

    /// Julian day (UT) of an instant.
    pub fn julian_day(instant: DateTime<Utc>) -> f64 {
        let seconds =
            instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
        seconds / SECONDS_PER_DAY + JD_UNIX_EPOCH
    }

    /// Parse an ISO-8601 / RFC 3339 timestamp into UTC.
    pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// How the observer's wall clock relates to UTC.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "kebab-case")]
    pub enum LocalTimeRule {
        /// Constant offset from UTC.
        Fixed { offset_minutes: i32 },
        /// Standard offset plus one hour from the second Sunday of March
        /// to the first Sunday of November (02:00 local both ways).
        NorthAmericanDst { standard_offset_minutes: i32 },
    }

    impl Default for LocalTimeRule {
        /// Atlantic time as observed in Bermuda.
        fn default() -> Self {
            Self::NorthAmericanDst {
                standard_offset_minutes: -240,
            }
        }
    }

    impl LocalTimeRule {
        /// Offset from UTC in effect at `instant`, in minutes.
        pub fn offset_minutes_at(&self, instant: DateTime<Utc>) -> i32 {
            match *self {
                Self::Fixed { offset_minutes } => offset_minutes,
                Self::NorthAmericanDst {
                    standard_offset_minutes,
                } => {
                    let year = instant.year();
                    let start = dst_boundary(year, 3, 2, standard_offset_minutes);
                    let end = dst_boundary(year, 11, 1, standard_offset_minutes + 60);
                    match (start, end) {
                        (Some(start), Some(end)) if instant >= start && instant < end => {
                            standard_offset_minutes + 60
                        }
                        _ => standard_offset_minutes,
                    }
                }
            }
        }

        /// Offset in effect at `instant` as a chrono offset.
        pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
            fixed_offset(self.offset_minutes_at(instant))
        }

        /// Convert an instant to the observer's wall clock.
        pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
            instant.with_timezone(&self.offset_at(instant))
        }

        /// Convert a wall-clock date and time at the observer into UTC.
        pub fn local_to_utc(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
            let naive = date.and_time(time);
            let first_guess = naive_local_to_utc(naive, self.base_offset_minutes());
            let offset = self.offset_minutes_at(first_guess);
            naive_local_to_utc(naive, offset)
        }

        /// Instant of local midnight starting `date`.
        pub fn local_midnight(&self, date: NaiveDate) -> DateTime<Utc> {
            self.local_to_utc(date, NaiveTime::MIN)
        }

        fn base_offset_minutes(&self) -> i32 {
            match *self {
                Self::Fixed { offset_minutes } => offset_minutes,
                Self::NorthAmericanDst {
                    standard_offset_minutes,
                } => standard_offset_minutes,
            }
        }
    }

    fn fixed_offset(minutes: i32) -> FixedOffset {
        FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    fn naive_local_to_utc(naive: NaiveDateTime, offset_minutes: i32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(naive - Duration::minutes(i64::from(offset_minutes))))
    }

    /// 02:00 local on the `nth` Sunday of `month`, expressed in UTC.
    fn dst_boundary(year: i32, month: u32, nth: u8, offset_minutes: i32) -> Option<DateTime<Utc>> {
        let day = NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, nth)?;
        let two_am = NaiveTime::from_hms_opt(2, 0, 0)?;
        Some(naive_local_to_utc(day.and_time(two_am), offset_minutes))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn unix_epoch_julian_day() {
            let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
            assert_eq!(julian_day(epoch), JD_UNIX_EPOCH);
            let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
            assert!((julian_day(j2000) - 2_451_545.0).abs() < 1e-9);
        }

        #[test]
        fn dst_boundaries_follow_local_two_am() {
            let rule = LocalTimeRule::default();
            // 2024-03-10 02:00 AST is 06:00 UTC.
            let before = Utc.with_ymd_and_hms(2024, 3, 10, 5, 59, 0).unwrap();
            let after = Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
            assert_eq!(rule.offset_minutes_at(before), -240);
            assert_eq!(rule.offset_minutes_at(after), -180);
            let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
            assert_eq!(
                rule.local_midnight(date),
                Utc.with_ymd_and_hms(2024, 7, 4, 3, 0, 0).unwrap()
            );
        }

        #[test]
        fn parses_rfc3339_with_offsets() {
            let parsed = parse_utc("2025-01-14T21:00:00-04:00").unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 15, 1, 0, 0).unwrap());
            assert!(parse_utc("NET January").is_none());
        }
    }
}
