use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET    /users/                                  -> list_users
/// POST   /users/                                  -> create_user
/// GET    /users/{id}                              -> get_user
/// PUT    /users/{id}                              -> put_user
/// GET    /users/email/{email}                     -> get_user_by_email
/// GET    /users/label-studio/{label_studio_id}    -> get_user_by_label_studio_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).put(users::put_user))
        .route("/users/email/{email}", get(users::get_user_by_email))
        .route(
            "/users/label-studio/{label_studio_id}",
            get(users::get_user_by_label_studio_id),
        )
}
