//! Domain types shared by the FishSense database and API crates.

pub mod error;
pub mod normalize;
pub mod types;
