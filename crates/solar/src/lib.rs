//! Sun position, twilight phases, and Earth-shadow helpers for launch viewing.

pub mod data;
pub mod spa;
pub mod twilight;

pub use data::{
    CalculatedSolarData, SolarData, SolarDataSource, SolarError, TwilightWindow, TwilightWindows,
};
pub use spa::{SolarPosition, solar_position, solar_position_at};
pub use twilight::{TwilightPhase, is_rocket_sunlit, shadow_height_m, twilight_phase};
