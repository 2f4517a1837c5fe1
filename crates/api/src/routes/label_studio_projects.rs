use axum::routing::get;
use axum::Router;

use crate::handlers::label_studio_projects;
use crate::state::AppState;

/// ```text
/// GET    /label-studio-projects/       -> list_projects
/// GET    /label-studio-projects/{id}   -> get_project
/// PUT    /label-studio-projects/{id}   -> put_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/label-studio-projects/",
            get(label_studio_projects::list_projects),
        )
        .route(
            "/label-studio-projects/{id}",
            get(label_studio_projects::get_project).put(label_studio_projects::put_project),
        )
}
