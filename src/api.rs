use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState,
    entities::user,
    error::AppError,
    models::{CreateMovie, CreateReview, CreateUser, MovieDetail, MovieSummary, ReviewOut},
};

/// JSON mirror of the HTML surface, mounted under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/movies", get(user_movies).post(create_movie))
        .route("/movies/{movie_id}", get(get_movie))
        .route("/movies/{movie_id}/reviews", get(movie_reviews).post(create_review))
}

/// Same taxonomy as the HTML surface, rendered as `{"error": …}`.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<user::Model>>> {
    Ok(Json(state.catalog.get_all_users().await?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<user::Model>)> {
    let user = state.catalog.add_user(body.name.as_deref().unwrap_or_default()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<user::Model>> {
    let user = state
        .catalog
        .get_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(user))
}

async fn user_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Vec<MovieSummary>>> {
    state
        .catalog
        .get_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    let movies = state.catalog.get_user_movies(user_id).await?;
    Ok(Json(movies.into_iter().map(MovieSummary::from).collect()))
}

async fn create_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Json(body): Json<CreateMovie>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let movie_id = state
        .catalog
        .add_movie_to_user(user_id, body.title.as_deref().unwrap_or_default(), body.year)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Movie added", "movie_id": movie_id }))))
}

async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<MovieDetail>> {
    let movie = state
        .catalog
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(AppError::NotFound("movie"))?;
    Ok(Json(movie.into()))
}

async fn movie_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<Vec<ReviewOut>>> {
    state
        .catalog
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(AppError::NotFound("movie"))?;
    let reviews = state.catalog.get_reviews_for_movie(movie_id).await?;
    Ok(Json(reviews.into_iter().map(|r| ReviewOut::from(r.review)).collect()))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
    Json(body): Json<CreateReview>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    state
        .catalog
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(AppError::NotFound("movie"))?;

    let (Some(user_id), Some(text), Some(rating)) = (body.user_id, body.text, body.rating) else {
        return Err(AppError::MissingField("review fields").into());
    };

    let review = state.catalog.add_review(user_id, movie_id, Some(&text), rating).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Review added", "review_id": review.id }))))
}
