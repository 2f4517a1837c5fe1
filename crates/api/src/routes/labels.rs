use axum::routing::get;
use axum::Router;

use crate::handlers::labels;
use crate::state::AppState;

/// ```text
/// GET    /labels/{kind}/{image_id}                -> get_label
/// PUT    /labels/{kind}/{image_id}                -> save_label
/// POST   /labels/{kind}/{image_id}                -> save_label
/// GET    /labels/{kind}/label-studio/{task_id}    -> get_label_by_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/labels/{kind}/{image_id}",
            get(labels::get_label)
                .put(labels::save_label)
                .post(labels::save_label),
        )
        .route(
            "/labels/{kind}/label-studio/{task_id}",
            get(labels::get_label_by_task),
        )
}
