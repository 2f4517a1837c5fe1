//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&mut PgConnection` as the first argument, so callers decide
//! whether a statement runs on a plain [`Session`](crate::Session) or inside
//! a transaction. Multi-statement mutations open their own transaction.

use sqlx::PgConnection;

pub mod camera_intrinsics_repo;
pub mod camera_repo;
pub mod dive_frame_cluster_repo;
pub mod dive_repo;
pub mod dive_slate_label_repo;
pub mod dive_slate_repo;
pub mod fish_repo;
pub mod head_tail_label_repo;
pub mod image_repo;
pub mod label_studio_project_repo;
pub mod laser_extrinsics_repo;
pub mod laser_label_repo;
pub mod measurement_repo;
pub mod species_label_repo;
pub mod species_repo;
pub mod user_repo;

pub use camera_intrinsics_repo::CameraIntrinsicsRepo;
pub use camera_repo::CameraRepo;
pub use dive_frame_cluster_repo::DiveFrameClusterRepo;
pub use dive_repo::DiveRepo;
pub use dive_slate_label_repo::DiveSlateLabelRepo;
pub use dive_slate_repo::DiveSlateRepo;
pub use fish_repo::FishRepo;
pub use head_tail_label_repo::HeadTailLabelRepo;
pub use image_repo::ImageRepo;
pub use label_studio_project_repo::LabelStudioProjectRepo;
pub use laser_extrinsics_repo::LaserExtrinsicsRepo;
pub use laser_label_repo::LaserLabelRepo;
pub use measurement_repo::MeasurementRepo;
pub use species_label_repo::SpeciesLabelRepo;
pub use species_repo::SpeciesRepo;
pub use user_repo::UserRepo;

/// Move a table's id sequence past its highest id.
///
/// Rows written with an explicit id bypass the `BIGSERIAL` default, so the
/// sequence is advanced afterwards in the same transaction. A table with no
/// positive id resets the sequence to start at 1.
pub async fn sync_id_sequence(
    conn: &mut PgConnection,
    table: &'static str,
) -> Result<(), sqlx::Error> {
    let query = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
                GREATEST(COALESCE(MAX(id), 0), 1), COALESCE(MAX(id), 0) >= 1) \
         FROM {table}"
    );
    sqlx::query(&query).execute(conn).await?;
    Ok(())
}
