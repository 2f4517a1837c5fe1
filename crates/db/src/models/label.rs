//! Human annotation labels imported from Label Studio.
//!
//! Four kinds share the same envelope (external task and project ids, the
//! annotator, the image, an update time, a completion flag and the raw task
//! JSON) and differ in their payload columns. Laser, head/tail and dive-slate
//! labels can be superseded by a newer annotation of the same image; species
//! labels cannot.

use std::fmt;

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Label kind as it appears in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelKind {
    Laser,
    HeadTail,
    Species,
    DiveSlate,
}

impl LabelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelKind::Laser => "laser",
            LabelKind::HeadTail => "head-tail",
            LabelKind::Species => "species",
            LabelKind::DiveSlate => "dive-slate",
        }
    }

    /// Entity name used in not-found messages.
    pub fn entity(self) -> &'static str {
        match self {
            LabelKind::Laser => "Laser label",
            LabelKind::HeadTail => "Head tail label",
            LabelKind::Species => "Species label",
            LabelKind::DiveSlate => "Dive slate label",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Laser
// ---------------------------------------------------------------------------

/// A row from the `laser_labels` table: where the laser dot sits in an image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LaserLabel {
    pub id: DbId,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub label: Option<String>,
    pub updated_at: Option<Timestamp>,
    pub superseded: bool,
    pub completed: bool,
    pub label_studio_json: Option<serde_json::Value>,
    pub image_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveLaserLabel {
    pub id: Option<DbId>,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub label: Option<String>,
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub superseded: bool,
    #[serde(default)]
    pub completed: bool,
    pub label_studio_json: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
}

impl TemporalSchema for SaveLaserLabel {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["updated_at"];
}

// ---------------------------------------------------------------------------
// Head / tail
// ---------------------------------------------------------------------------

/// A row from the `head_tail_labels` table: snout and fork points of a fish.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HeadTailLabel {
    pub id: DbId,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub head_x: Option<f64>,
    pub head_y: Option<f64>,
    pub tail_x: Option<f64>,
    pub tail_y: Option<f64>,
    pub updated_at: Option<Timestamp>,
    pub superseded: bool,
    pub completed: bool,
    pub label_studio_json: Option<serde_json::Value>,
    pub image_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveHeadTailLabel {
    pub id: Option<DbId>,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub head_x: Option<f64>,
    pub head_y: Option<f64>,
    pub tail_x: Option<f64>,
    pub tail_y: Option<f64>,
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub superseded: bool,
    #[serde(default)]
    pub completed: bool,
    pub label_studio_json: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
}

impl TemporalSchema for SaveHeadTailLabel {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["updated_at"];
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// A row from the `species_labels` table: the classification form answers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SpeciesLabel {
    pub id: DbId,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub image_url: Option<String>,
    pub updated_at: Option<Timestamp>,
    pub completed: bool,
    pub grouping: Option<String>,
    pub top_three_photos_of_group: Option<bool>,
    pub slate_upside_down: Option<bool>,
    pub laser_x: Option<f64>,
    pub laser_y: Option<f64>,
    pub laser_label: Option<String>,
    pub content_of_image: Option<String>,
    pub fish_measurable_category: Option<String>,
    pub fish_angle_category: Option<String>,
    pub fish_curved_category: Option<String>,
    pub label_studio_json: Option<serde_json::Value>,
    pub image_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveSpeciesLabel {
    pub id: Option<DbId>,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub image_url: Option<String>,
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub completed: bool,
    pub grouping: Option<String>,
    pub top_three_photos_of_group: Option<bool>,
    pub slate_upside_down: Option<bool>,
    pub laser_x: Option<f64>,
    pub laser_y: Option<f64>,
    pub laser_label: Option<String>,
    pub content_of_image: Option<String>,
    pub fish_measurable_category: Option<String>,
    pub fish_angle_category: Option<String>,
    pub fish_curved_category: Option<String>,
    pub label_studio_json: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
}

impl TemporalSchema for SaveSpeciesLabel {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["updated_at"];
}

// ---------------------------------------------------------------------------
// Dive slate
// ---------------------------------------------------------------------------

/// A row from the `dive_slate_labels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiveSlateLabel {
    pub id: DbId,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub image_url: Option<String>,
    pub updated_at: Option<Timestamp>,
    pub superseded: bool,
    pub completed: bool,
    pub label_studio_json: Option<serde_json::Value>,
    pub image_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveDiveSlateLabel {
    pub id: Option<DbId>,
    pub label_studio_task_id: Option<i64>,
    pub label_studio_project_id: Option<i64>,
    pub image_url: Option<String>,
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub superseded: bool,
    #[serde(default)]
    pub completed: bool,
    pub label_studio_json: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
}

impl TemporalSchema for SaveDiveSlateLabel {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["updated_at"];
}
