//! Launch azimuth mapping and trajectory reconstruction.

pub mod cache;
pub mod mapping;
pub mod model;
pub mod reconstruction;

pub use facade::*;

mod facade;
