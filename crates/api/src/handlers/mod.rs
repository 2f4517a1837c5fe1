//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers take a [`DbSession`](crate::extract::DbSession), delegate to the
//! corresponding repository in `fishsense_db`, and map errors via
//! [`AppError`](crate::error::AppError). Mutations answer `201 Created` with
//! the bare primary key.

pub mod cameras;
pub mod dive_slates;
pub mod dives;
pub mod fish;
pub mod images;
pub mod label_studio_projects;
pub mod labels;
pub mod users;

use axum::http::StatusCode;
use axum::Json;
use fishsense_core::types::DbId;

/// Response of every create/update endpoint.
pub type Created = (StatusCode, Json<DbId>);

pub(crate) fn created(id: DbId) -> Created {
    (StatusCode::CREATED, Json(id))
}
