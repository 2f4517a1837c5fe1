//! Handlers for the `/users` resource.

use axum::extract::Path;
use axum::Json;
use fishsense_core::types::DbId;
use fishsense_db::models::user::{SaveUser, User};
use fishsense_db::repositories::UserRepo;

use super::{created, Created};
use crate::error::{AppError, AppResult};
use crate::extract::{DbSession, NormalizedJson};

/// GET /api/v1/users/
pub async fn list_users(mut db: DbSession) -> AppResult<Json<Vec<User>>> {
    Ok(Json(UserRepo::list(&mut db).await?))
}

/// GET /api/v1/users/{id}
pub async fn get_user(mut db: DbSession, Path(id): Path<DbId>) -> AppResult<Json<User>> {
    UserRepo::find_by_id(&mut db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User", id))
}

/// GET /api/v1/users/email/{email}
pub async fn get_user_by_email(
    mut db: DbSession,
    Path(email): Path<String>,
) -> AppResult<Json<User>> {
    UserRepo::find_by_email(&mut db, &email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User", email))
}

/// GET /api/v1/users/label-studio/{label_studio_id}
pub async fn get_user_by_label_studio_id(
    mut db: DbSession,
    Path(label_studio_id): Path<i64>,
) -> AppResult<Json<User>> {
    UserRepo::find_by_label_studio_id(&mut db, label_studio_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User", label_studio_id))
}

/// POST /api/v1/users/
pub async fn create_user(
    mut db: DbSession,
    NormalizedJson(input): NormalizedJson<SaveUser>,
) -> AppResult<Created> {
    let id = UserRepo::create(&mut db, &input).await?;
    tracing::info!(user_id = id, "User created");
    Ok(created(id))
}

/// PUT /api/v1/users/{id}
pub async fn put_user(
    mut db: DbSession,
    Path(id): Path<DbId>,
    NormalizedJson(input): NormalizedJson<SaveUser>,
) -> AppResult<Created> {
    let id = UserRepo::upsert(&mut db, id, &input).await?;
    Ok(created(id))
}
