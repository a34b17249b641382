use serde::{Deserialize, Serialize};

use crate::entities::{movie, review};

/// A review joined with its author's display name, so pages don't have to
/// look the user up per row.
#[derive(Clone, Debug)]
pub struct ReviewWithAuthor {
    pub review: review::Model,
    pub author_name: String,
}

// Form payloads for the HTML surface. Fields are optional so a missing input
// reaches the handler instead of failing form deserialization.

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieForm {
    pub title: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewForm {
    pub user_id: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<String>,
}

// JSON API payloads.

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub user_id: Option<i32>,
    pub text: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
}

impl From<movie::Model> for MovieSummary {
    fn from(m: movie::Model) -> Self {
        Self { id: m.id, title: m.title, year: m.year }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub user_id: i32,
}

impl From<movie::Model> for MovieDetail {
    fn from(m: movie::Model) -> Self {
        Self { id: m.id, title: m.title, year: m.year, user_id: m.user_id }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewOut {
    pub user_id: i32,
    pub text: Option<String>,
    pub rating: i32,
}

impl From<review::Model> for ReviewOut {
    fn from(r: review::Model) -> Self {
        Self { user_id: r.user_id, text: r.text, rating: r.rating }
    }
}
