use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use filmshelf::{AppState, app, catalog::Catalog, config::Config};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

async fn setup() -> (Router, Catalog) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let catalog = Catalog::new(db);
    catalog.add_user("TestUser").await.unwrap();

    let config = Arc::new(Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
    });
    let state = Arc::new(AppState { config, catalog: catalog.clone() });
    (app(state), catalog)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// --- HTML surface ---

#[tokio::test]
async fn homepage_lists_users() {
    let (app, _) = setup().await;

    let response =
        app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("TestUser"));
}

#[tokio::test]
async fn add_user_form_redirects_then_lists() {
    let (app, _) = setup().await;

    let response =
        app.clone().oneshot(form_post("/add_user", "name=NewUser")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response =
        app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
    assert!(body_string(response).await.contains("NewUser"));
}

#[tokio::test]
async fn add_user_without_name_is_bad_request() {
    let (app, _) = setup().await;

    let response = app.oneshot(form_post("/add_user", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_movies_page_renders_or_404s() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);
    catalog.add_movie_to_user(user.id, "Inception", Some(2010)).await.unwrap();

    let response = app
        .clone()
        .oneshot(Request::get(format!("/users/{}", user.id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("TestUser"));
    assert!(body.contains("Inception"));

    let response = app
        .oneshot(Request::get("/users/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_movie_form_flow() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);

    let uri = format!("/users/{}/add_movie", user.id);
    let response = app
        .clone()
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        app.clone().oneshot(form_post(&uri, "title=New+Movie&year=2025")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let movies = catalog.get_user_movies(user.id).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "New Movie");
    assert_eq!(movies[0].year, Some(2025));

    // Missing title is a 400; a bad user id is a 404 even with a valid form.
    let response = app.clone().oneshot(form_post(&uri, "year=2025")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        app.oneshot(form_post("/users/999/add_movie", "title=Ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_form_flow() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);
    let movie_id = catalog.add_movie_to_user(user.id, "Inception", Some(2010)).await.unwrap();

    let uri = format!("/movies/{movie_id}/reviews");
    let body = format!("user_id={}&review_text=Loved+it&rating=9", user.id);
    let response = app.clone().oneshot(form_post(&uri, &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .clone()
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("Loved it"));
    assert!(page.contains("TestUser"));

    // Incomplete form.
    let response = app.clone().oneshot(form_post(&uri, "rating=9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown movie.
    let response =
        app.oneshot(form_post("/movies/999/reviews", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// --- JSON API ---

#[tokio::test]
async fn api_users_list_and_create() {
    let (app, _) = setup().await;

    let response = app
        .clone()
        .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let users = body_json(response).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["name"], "TestUser");

    let response =
        app.clone().oneshot(json_post("/api/users", json!({"name": "ApiUser"}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "ApiUser");
    assert!(created["id"].as_i64().unwrap() > 0);

    let response = app.oneshot(json_post("/api/users", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_get_user_or_404() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);

    let response = app
        .clone()
        .oneshot(Request::get(format!("/api/users/{}", user.id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "TestUser");

    let response = app
        .oneshot(Request::get("/api/users/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn api_user_movies_roundtrip() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);

    let uri = format!("/api/users/{}/movies", user.id);
    let response = app
        .clone()
        .oneshot(json_post(&uri, json!({"title": "Inception", "year": 2010})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Movie added");
    let movie_id = created["movie_id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let movies = body_json(response).await;
    assert_eq!(movies.as_array().unwrap().len(), 1);
    assert_eq!(movies[0]["id"].as_i64().unwrap(), movie_id);
    assert_eq!(movies[0]["title"], "Inception");
    assert_eq!(movies[0]["year"], 2010);

    let response =
        app.clone().oneshot(json_post(&uri, json!({"year": 2010}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_post("/api/users/999/movies", json!({"title": "Ghost"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_movie_detail() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);
    let movie_id = catalog.add_movie_to_user(user.id, "Inception", Some(2010)).await.unwrap();

    let response = app
        .clone()
        .oneshot(Request::get(format!("/api/movies/{movie_id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let movie = body_json(response).await;
    assert_eq!(movie["title"], "Inception");
    assert_eq!(movie["user_id"].as_i64().unwrap(), i64::from(user.id));

    let response = app
        .oneshot(Request::get("/api/movies/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_reviews_roundtrip() {
    let (app, catalog) = setup().await;
    let user = catalog.get_all_users().await.unwrap().remove(0);
    let movie_id = catalog.add_movie_to_user(user.id, "Inception", Some(2010)).await.unwrap();

    let uri = format!("/api/movies/{movie_id}/reviews");
    let response = app
        .clone()
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(json_post(&uri, json!({"user_id": user.id, "text": "Loved it", "rating": 9})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Review added");
    assert!(created["review_id"].as_i64().unwrap() > 0);

    let response = app
        .clone()
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let reviews = body_json(response).await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["text"], "Loved it");
    assert_eq!(reviews[0]["rating"], 9);

    // All three fields are required.
    let response =
        app.clone().oneshot(json_post(&uri, json!({"user_id": user.id, "rating": 9}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_post("/api/movies/999/reviews", json!({"user_id": 1, "text": "x", "rating": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
