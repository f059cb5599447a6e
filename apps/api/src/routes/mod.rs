pub mod health;
pub mod landing;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::cv::handlers::handle_cv_upload;
use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/jobs", get(handlers::handle_list_jobs))
        .route("/jobs/add", post(handlers::handle_add_job))
        .route("/jobs/insert-dummy", post(handlers::handle_insert_dummy))
        // CV ingestion
        .route(
            "/cv/upload",
            post(handle_cv_upload).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        );

    let router = match &state.config.static_dir {
        Some(dir) => router
            .route("/", get(landing::frontend_redirect))
            .nest_service("/static", ServeDir::new(dir)),
        None => router.route("/", get(landing::landing_handler)),
    };

    router.with_state(state)
}
