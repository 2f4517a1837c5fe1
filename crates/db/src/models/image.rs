//! Image model.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub path: String,
    pub taken_datetime: Option<Timestamp>,
    /// Content checksum, unique across all images.
    pub checksum: String,
    /// Marks the representative image used by per-dive aggregate queries.
    pub is_canonical: bool,
    pub dive_id: Option<DbId>,
    pub camera_id: Option<DbId>,
}

/// DTO for creating or replacing an image.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveImage {
    #[validate(length(min = 1))]
    pub path: String,
    pub taken_datetime: Option<Timestamp>,
    #[validate(length(min = 1))]
    pub checksum: String,
    #[serde(default)]
    pub is_canonical: bool,
    pub dive_id: Option<DbId>,
    pub camera_id: Option<DbId>,
}

impl TemporalSchema for SaveImage {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["taken_datetime"];
}
