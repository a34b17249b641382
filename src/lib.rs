pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;
pub mod templates;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/add_user", post(routes::add_user))
        .route("/users/{user_id}", get(routes::user_movies))
        .route("/users/{user_id}/add_movie", get(routes::add_movie_form).post(routes::add_movie))
        .route("/movies/{movie_id}/reviews", get(routes::movie_reviews).post(routes::post_review))
        .nest("/api", api::router())
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
