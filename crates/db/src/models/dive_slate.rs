//! Dive slate model: the printed calibration target carried on a dive.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `dive_slates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiveSlate {
    pub id: DbId,
    pub name: String,
    pub dpi: Option<i32>,
    pub path: String,
    pub created_at: Option<Timestamp>,
    /// Reference point coordinates on the slate, `[x, y]` pairs.
    pub reference_points: Option<Json<Vec<(f64, f64)>>>,
}

/// DTO for creating or replacing a dive slate.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveDiveSlate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub dpi: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub path: String,
    /// Defaults to now on first insert; kept as-is on replace when omitted.
    pub created_at: Option<Timestamp>,
    pub reference_points: Option<Vec<(f64, f64)>>,
}

impl TemporalSchema for SaveDiveSlate {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["created_at"];
}
