use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use crate::server::config::ServerConfig;
use crate::services::{pet_api::PetApiClient, photo_storage};
use crate::web::routes::pet_routes;

pub mod error;
pub mod flash;
pub mod forms;
pub mod routes;
pub mod views;

#[derive(Clone)]
pub struct AppState {
    pub pet_api: PetApiClient,
    pub photos: photo_storage::PhotoStorage,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState {
        pet_api: PetApiClient::new(config.petstore_api_url.clone()),
        photos: photo_storage::PhotoStorage::new(
            config.photo_storage_root.clone(),
            config.photo_public_prefix.clone(),
        ),
    });

    Router::new()
        .route("/healthz", get(health_check_handler))
        .route("/", get(|| async { Redirect::to("/pets") }))
        .nest("/pets", pet_routes::pet_router())
        .nest_service(
            &config.photo_public_prefix,
            ServeDir::new(&config.photo_storage_root),
        )
        // Room for a full-size photo on top of axum's 2 MB default.
        .layer(DefaultBodyLimit::max(
            photo_storage::MAX_PHOTO_BYTES + 64 * 1024,
        ))
        .with_state(app_state)
}
