use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{AddMovieForm, AddReviewForm, AddUserForm},
    templates,
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let users = state.catalog.get_all_users().await?;
    Ok(Html(templates::users_page(&users)))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddUserForm>,
) -> AppResult<Redirect> {
    state.catalog.add_user(form.name.as_deref().unwrap_or_default()).await?;
    Ok(Redirect::to("/"))
}

pub async fn user_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Html<String>> {
    let user = state
        .catalog
        .get_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    let movies = state.catalog.get_user_movies(user_id).await?;
    Ok(Html(templates::user_movies_page(&user, &movies)))
}

pub async fn add_movie_form(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Html<String>> {
    let user = state
        .catalog
        .get_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Html(templates::add_movie_page(&user)))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Form(form): Form<AddMovieForm>,
) -> AppResult<Redirect> {
    // Resolve the path entity first so a bad user id is a 404 even when the
    // form is also incomplete.
    state
        .catalog
        .get_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let year = form.year.as_deref().and_then(|y| y.trim().parse().ok());
    state
        .catalog
        .add_movie(user_id, form.title.as_deref().unwrap_or_default(), year, None, None)
        .await?;
    Ok(Redirect::to(&format!("/users/{user_id}")))
}

pub async fn movie_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> AppResult<Html<String>> {
    let movie = state
        .catalog
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(AppError::NotFound("movie"))?;
    let reviews = state.catalog.get_reviews_for_movie(movie_id).await?;
    let users = state.catalog.get_all_users().await?;
    Ok(Html(templates::movie_reviews_page(&movie, &reviews, &users)))
}

pub async fn post_review(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
    Form(form): Form<AddReviewForm>,
) -> AppResult<Redirect> {
    state
        .catalog
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(AppError::NotFound("movie"))?;

    let user_id: Option<i32> = form.user_id.as_deref().and_then(|v| v.trim().parse().ok());
    let rating: Option<i32> = form.rating.as_deref().and_then(|v| v.trim().parse().ok());
    let text = form.review_text.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let (Some(user_id), Some(rating), Some(text)) = (user_id, rating, text) else {
        return Err(AppError::MissingField("review fields"));
    };

    state.catalog.add_review(user_id, movie_id, Some(text), rating).await?;
    Ok(Redirect::to(&format!("/movies/{movie_id}/reviews")))
}
