//! OpenAPI document for the HTTP surface, served at `/docs` and
//! `/openapi.json`.

use axum::{routing::get, Json, Router};
use utoipa::openapi::info::InfoBuilder;
use utoipa::openapi::path::{HttpMethod, OperationBuilder, PathItemBuilder, PathsBuilder};
use utoipa::openapi::{OpenApi, OpenApiBuilder};

use crate::state::AppState;

type Operations = &'static [(HttpMethod, &'static str)];

/// Every routed path with its operations.
const ENDPOINTS: &[(&str, Operations)] = &[
    ("/", &[(HttpMethod::Get, "Service metadata")]),
    ("/health", &[(HttpMethod::Get, "Service and database health")]),
    ("/api/v1/cameras/", &[(HttpMethod::Get, "List cameras")]),
    (
        "/api/v1/cameras/{id}",
        &[
            (HttpMethod::Get, "Camera by id"),
            (HttpMethod::Put, "Create or update a camera"),
        ],
    ),
    (
        "/api/v1/cameras/{id}/intrinsics/",
        &[
            (HttpMethod::Get, "Current intrinsics of a camera"),
            (HttpMethod::Put, "Create or update camera intrinsics"),
        ],
    ),
    ("/api/v1/dive-slates/", &[(HttpMethod::Get, "List dive slates")]),
    (
        "/api/v1/dive-slates/{id}",
        &[
            (HttpMethod::Get, "Dive slate by id"),
            (HttpMethod::Put, "Create or update a dive slate"),
        ],
    ),
    ("/api/v1/dives/", &[(HttpMethod::Get, "List dives")]),
    (
        "/api/v1/dives/{id}",
        &[
            (HttpMethod::Get, "Dive by id"),
            (HttpMethod::Put, "Create or update a dive"),
        ],
    ),
    ("/api/v1/dives/{id}/images/", &[(HttpMethod::Get, "Images of a dive")]),
    (
        "/api/v1/dives/{id}/laser-extrinsics",
        &[
            (HttpMethod::Get, "Current laser extrinsics of a dive"),
            (HttpMethod::Post, "Record new laser extrinsics"),
        ],
    ),
    (
        "/api/v1/dives/{id}/images/clusters/",
        &[
            (HttpMethod::Get, "Frame clusters of a dive"),
            (HttpMethod::Post, "Create a frame cluster"),
        ],
    ),
    (
        "/api/v1/dives/{id}/images/clusters/{key}",
        &[
            (HttpMethod::Get, "Frame clusters of a dive by data source"),
            (HttpMethod::Put, "Create or update a frame cluster by id"),
        ],
    ),
    (
        "/api/v1/dives/{id}/labels/{kind}",
        &[(HttpMethod::Get, "Labels of a kind for every image of a dive")],
    ),
    (
        "/api/v1/images/{id}",
        &[
            (HttpMethod::Get, "Image by id"),
            (HttpMethod::Put, "Create or update an image"),
        ],
    ),
    (
        "/api/v1/images/checksum/{checksum}",
        &[(HttpMethod::Get, "Image by checksum")],
    ),
    ("/api/v1/fish/", &[(HttpMethod::Get, "List fish")]),
    ("/api/v1/fish", &[(HttpMethod::Post, "Create or merge a fish")]),
    ("/api/v1/fish/{id}", &[(HttpMethod::Get, "Fish by id")]),
    (
        "/api/v1/fish/{id}/measurements",
        &[
            (HttpMethod::Get, "Measurements of a fish"),
            (HttpMethod::Post, "Create or merge a measurement"),
        ],
    ),
    ("/api/v1/fish/species/", &[(HttpMethod::Get, "List species")]),
    (
        "/api/v1/fish/species",
        &[(HttpMethod::Post, "Create or merge a species")],
    ),
    (
        "/api/v1/fish/species/{scientific_name}",
        &[(HttpMethod::Get, "Species by scientific name")],
    ),
    (
        "/api/v1/users/",
        &[
            (HttpMethod::Get, "List users"),
            (HttpMethod::Post, "Create a user"),
        ],
    ),
    (
        "/api/v1/users/{id}",
        &[
            (HttpMethod::Get, "User by id"),
            (HttpMethod::Put, "Create or update a user"),
        ],
    ),
    ("/api/v1/users/email/{email}", &[(HttpMethod::Get, "User by email")]),
    (
        "/api/v1/users/label-studio/{label_studio_id}",
        &[(HttpMethod::Get, "User by Label Studio id")],
    ),
    (
        "/api/v1/label-studio-projects/",
        &[(HttpMethod::Get, "List Label Studio projects")],
    ),
    (
        "/api/v1/label-studio-projects/{id}",
        &[
            (HttpMethod::Get, "Label Studio project by id"),
            (HttpMethod::Put, "Create or update a Label Studio project"),
        ],
    ),
    (
        "/api/v1/labels/{kind}/{image_id}",
        &[
            (HttpMethod::Get, "Authoritative label of an image"),
            (HttpMethod::Put, "Create or update a label"),
            (HttpMethod::Post, "Create or update a label"),
        ],
    ),
    (
        "/api/v1/labels/{kind}/label-studio/{task_id}",
        &[(HttpMethod::Get, "Label by Label Studio task id")],
    ),
];

/// Tag an operation by its resource: the first segment after `/api/v1`.
fn tag_for(path: &str) -> &str {
    path.strip_prefix("/api/v1/")
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("service")
}

/// Assemble the OpenAPI document from [`ENDPOINTS`].
pub fn api_doc() -> OpenApi {
    let mut paths = PathsBuilder::new();
    for (path, operations) in ENDPOINTS {
        let mut item = PathItemBuilder::new();
        for (method, summary) in operations.iter() {
            let operation = OperationBuilder::new()
                .summary(Some(*summary))
                .tag(tag_for(path))
                .build();
            item = item.operation(method.clone(), operation);
        }
        paths = paths.path(*path, item.build());
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("FishSense API")
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .paths(paths.build())
        .build()
}

async fn docs() -> Json<OpenApi> {
    Json(api_doc())
}

/// Mount the document routes (NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/docs", get(docs))
        .route("/openapi.json", get(docs))
}
