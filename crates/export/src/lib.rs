//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod trajectory {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;
    use tracker_trajectory::{EngineStatus, FlightStage, TrajectoryPoint};

    use super::{ExportError, writer_for_path};

    /// CSV row for one trajectory point; altitude in km for readability.
    #[derive(Debug, Clone, Serialize)]
    pub struct Record {
        pub time_s: f64,
        pub latitude: f64,
        pub longitude: f64,
        pub altitude_km: f64,
        pub distance_km: f64,
        pub bearing_deg: f64,
        pub elevation_deg: f64,
        pub above_horizon: bool,
        pub stage: FlightStage,
        pub engine_status: EngineStatus,
    }

    impl From<&TrajectoryPoint> for Record {
        fn from(point: &TrajectoryPoint) -> Self {
            Self {
                time_s: point.time,
                latitude: point.latitude,
                longitude: point.longitude,
                altitude_km: point.altitude / 1_000.0,
                distance_km: point.distance_from_observer,
                bearing_deg: point.bearing_from_observer,
                elevation_deg: point.elevation_angle,
                above_horizon: point.above_horizon,
                stage: point.stage,
                engine_status: point.engine_status,
            }
        }
    }

    /// Write points as CSV with a header row.
    pub fn write_csv<W: Write>(writer: W, points: &[TrajectoryPoint]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for point in points {
            csv.serialize(Record::from(point))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_csv_file(path: &Path, points: &[TrajectoryPoint]) -> Result<(), ExportError> {
        write_csv(writer_for_path(path)?, points)
    }
}

pub mod json {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::{ExportError, writer_for_path};

    /// Pretty-printed JSON document followed by a newline.
    pub fn write_pretty<W: Write, T: Serialize + ?Sized>(
        mut writer: W,
        value: &T,
    ) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_pretty_file<T: Serialize + ?Sized>(
        path: &Path,
        value: &T,
    ) -> Result<(), ExportError> {
        write_pretty(writer_for_path(path)?, value)
    }
}
