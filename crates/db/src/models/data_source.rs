use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Provenance of a cluster: produced by a model or by human annotators.
///
/// Stored as the PostgreSQL enum `data_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "data_source", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Prediction,
    LabelStudio,
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PREDICTION" => Ok(DataSource::Prediction),
            "LABEL_STUDIO" => Ok(DataSource::LabelStudio),
            other => Err(format!(
                "unknown data source `{other}`, expected PREDICTION or LABEL_STUDIO"
            )),
        }
    }
}
