//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` save DTO used for inserts and upserts, carrying its
//!   [`TemporalSchema`](fishsense_core::normalize::TemporalSchema) table

pub mod camera;
pub mod data_source;
pub mod dive;
pub mod dive_frame_cluster;
pub mod dive_slate;
pub mod fish;
pub mod image;
pub mod label;
pub mod label_studio_project;
pub mod user;
