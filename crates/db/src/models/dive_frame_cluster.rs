//! Dive frame clusters: groups of images showing the same fish.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::data_source::DataSource;

/// A `dive_frame_clusters` row with its member image ids, ascending.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct DiveFrameClusterJson {
    pub id: DbId,
    pub image_ids: Vec<DbId>,
    pub data_source: DataSource,
    pub updated_at: Option<Timestamp>,
    pub dive_id: Option<DbId>,
    pub fish_id: Option<DbId>,
}

/// DTO for creating or replacing a cluster. The dive id comes from the URL.
///
/// `image_ids` is the complete membership; any previous mapping rows are
/// replaced.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveDiveFrameCluster {
    pub data_source: DataSource,
    pub updated_at: Option<Timestamp>,
    pub fish_id: Option<DbId>,
    #[serde(default)]
    pub image_ids: Vec<DbId>,
}

impl TemporalSchema for SaveDiveFrameCluster {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["updated_at"];
}

impl SaveDiveFrameCluster {
    /// Member ids, sorted and without duplicates.
    pub fn unique_image_ids(&self) -> Vec<DbId> {
        let mut ids = self.image_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_members_collapse() {
        let input = SaveDiveFrameCluster {
            data_source: DataSource::Prediction,
            updated_at: None,
            fish_id: None,
            image_ids: vec![9, 3, 9, 1, 3],
        };
        assert_eq!(input.unique_image_ids(), vec![1, 3, 9]);
    }
}
