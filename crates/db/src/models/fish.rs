//! Species, fish and measurement models.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `species` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Species {
    pub id: DbId,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
}

/// DTO for creating a species, or merging onto an existing id.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveSpecies {
    pub id: Option<DbId>,
    pub scientific_name: Option<String>,
    pub common_name: Option<String>,
}

impl TemporalSchema for SaveSpecies {
    const TEMPORAL_FIELDS: &'static [&'static str] = &[];
}

/// A row from the `fish` table: one individual animal.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Fish {
    pub id: DbId,
    pub species_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveFish {
    pub id: Option<DbId>,
    pub species_id: Option<DbId>,
}

impl TemporalSchema for SaveFish {
    const TEMPORAL_FIELDS: &'static [&'static str] = &[];
}

/// A row from the `measurements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measurement {
    pub id: DbId,
    pub length_m: Option<f64>,
    pub image_id: Option<DbId>,
    pub fish_id: Option<DbId>,
}

/// DTO for recording a measurement. The fish id comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveMeasurement {
    pub id: Option<DbId>,
    #[validate(range(min = 0.0))]
    pub length_m: Option<f64>,
    pub image_id: Option<DbId>,
}

impl TemporalSchema for SaveMeasurement {
    const TEMPORAL_FIELDS: &'static [&'static str] = &[];
}
