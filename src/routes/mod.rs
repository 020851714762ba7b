pub mod endpoints;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(home))
        .route(
            "/endpoints",
            get(endpoints::list).post(endpoints::create),
        )
        .route(
            "/endpoints/",
            get(endpoints::list).post(endpoints::create),
        )
        .route(
            "/endpoints/{name}",
            get(endpoints::get_image)
                .patch(endpoints::update)
                .delete(endpoints::delete),
        )
        // Singular aliases kept for older clients
        .route("/endpoint/", post(endpoints::create))
        .route("/endpoint/{name}", patch(endpoints::update))
}

async fn home() -> &'static str {
    "File Sharing service"
}
