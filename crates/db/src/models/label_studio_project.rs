use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `label_studio_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LabelStudioProject {
    pub id: DbId,
    /// Project id inside Label Studio.
    pub label_studio_project_id: Option<i64>,
    pub name: Option<String>,
    pub date_created: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveLabelStudioProject {
    pub label_studio_project_id: Option<i64>,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub date_created: Option<Timestamp>,
}

impl TemporalSchema for SaveLabelStudioProject {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["date_created"];
}
