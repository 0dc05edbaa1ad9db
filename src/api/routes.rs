use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::errors::ApiError;
use super::exercises::exercise_routes;
use super::health::health_check;
use crate::auth::{cors_layer, JwtService};
use crate::services::ExerciseService;
use crate::store::ExerciseStore;

pub fn create_routes(store: Arc<dyn ExerciseStore>, jwt_secret: &str) -> Router {
    let exercise_service = ExerciseService::new(store);
    let jwt_service = JwtService::new(jwt_secret);

    Router::new()
        .route("/health", get(health_check))
        .merge(exercise_routes(exercise_service, jwt_service))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Not found.".to_string())
}
