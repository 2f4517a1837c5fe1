//! Dive and laser extrinsics models.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `dives` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dive {
    pub id: DbId,
    pub name: String,
    pub path: String,
    pub dive_datetime: Option<Timestamp>,
    pub priority: Option<String>,
    pub flip_dive_slate: Option<bool>,
    pub camera_id: Option<DbId>,
    pub dive_slate_id: Option<DbId>,
}

/// DTO for creating or replacing a dive.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveDive {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub path: String,
    pub dive_datetime: Option<Timestamp>,
    pub priority: Option<String>,
    pub flip_dive_slate: Option<bool>,
    pub camera_id: Option<DbId>,
    pub dive_slate_id: Option<DbId>,
}

impl TemporalSchema for SaveDive {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["dive_datetime"];
}

/// A row from the `laser_extrinsics` table.
///
/// A dive accumulates calibrations over time; the one with the latest
/// `created_at` is current.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LaserExtrinsics {
    pub id: DbId,
    pub laser_position: Json<Vec<f64>>,
    pub laser_axis: Json<Vec<f64>>,
    pub created_at: Timestamp,
    pub dive_id: Option<DbId>,
    pub camera_id: DbId,
}

/// DTO for recording a new laser calibration. The dive id comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLaserExtrinsics {
    #[serde(default)]
    pub laser_position: Vec<f64>,
    #[serde(default)]
    pub laser_axis: Vec<f64>,
    /// Defaults to now.
    pub created_at: Option<Timestamp>,
    pub camera_id: DbId,
}

impl TemporalSchema for CreateLaserExtrinsics {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["created_at"];
}
