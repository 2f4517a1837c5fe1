//! Camera and camera intrinsics models.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `cameras` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Camera {
    pub id: DbId,
    pub serial_number: String,
    pub name: String,
}

/// DTO for creating or replacing a camera. The id comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveCamera {
    #[validate(length(min = 1))]
    pub serial_number: String,
    #[validate(length(min = 1))]
    pub name: String,
}

impl TemporalSchema for SaveCamera {
    const TEMPORAL_FIELDS: &'static [&'static str] = &[];
}

/// A row from the `camera_intrinsics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CameraIntrinsics {
    pub id: DbId,
    /// Row-major 3x3 pinhole matrix.
    pub camera_matrix: Json<Vec<Vec<f64>>>,
    pub distortion_coefficients: Json<Vec<f64>>,
    pub camera_id: DbId,
}

/// DTO for creating or replacing intrinsics.
///
/// With an `id` the row is upserted onto that id; without one a new
/// calibration is inserted and becomes the camera's current one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveCameraIntrinsics {
    pub id: Option<DbId>,
    #[serde(default)]
    pub camera_matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub distortion_coefficients: Vec<f64>,
}

impl TemporalSchema for SaveCameraIntrinsics {
    const TEMPORAL_FIELDS: &'static [&'static str] = &[];
}
