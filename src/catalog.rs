use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{director, genre, movie, review, user},
    error::{AppError, AppResult},
    models::ReviewWithAuthor,
};

/// Data-access facade over the catalog tables. Every method is its own unit
/// of work; cascading deletes run children-first inside one transaction.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // --- users ---

    pub async fn get_all_users(&self) -> AppResult<Vec<user::Model>> {
        Ok(user::Entity::find().all(&self.db).await?)
    }

    pub async fn get_user_by_id(&self, user_id: i32) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    pub async fn add_user(&self, name: &str) -> AppResult<user::Model> {
        let name = required(name, "name")?;
        let model = user::ActiveModel { name: Set(name), ..Default::default() };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn update_user_name(&self, user_id: i32, new_name: &str) -> AppResult<user::Model> {
        let name = required(new_name, "name")?;
        let existing = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        let mut active: user::ActiveModel = existing.into();
        active.name = Set(name);
        Ok(active.update(&self.db).await?)
    }

    /// Removes the user, the user's movies, and every review either written
    /// by the user or attached to one of those movies.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        user::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("user"))?;

        let movie_ids: Vec<i32> = movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        let reviews = review::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(review::Column::UserId.eq(user_id))
                    .add(review::Column::MovieId.is_in(movie_ids)),
            )
            .exec(&txn)
            .await?;
        let movies = movie::Entity::delete_many()
            .filter(movie::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;
        debug!(
            user_id,
            movies = movies.rows_affected,
            reviews = reviews.rows_affected,
            "deleted user"
        );
        Ok(())
    }

    // --- movies ---

    pub async fn get_all_movies(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().all(&self.db).await?)
    }

    pub async fn get_user_movies(&self, user_id: i32) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?)
    }

    pub async fn get_movie_by_id(&self, movie_id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(movie_id).one(&self.db).await?)
    }

    pub async fn add_movie(
        &self,
        user_id: i32,
        title: &str,
        year: Option<i32>,
        director_id: Option<i32>,
        genre_id: Option<i32>,
    ) -> AppResult<movie::Model> {
        let title = required(title, "title")?;
        ensure_user_exists(&self.db, user_id).await?;
        ensure_movie_refs(&self.db, director_id, genre_id).await?;

        let model = movie::ActiveModel {
            title: Set(title),
            year: Set(year),
            user_id: Set(user_id),
            director_id: Set(director_id),
            genre_id: Set(genre_id),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Compound convenience: create a movie owned by `user_id` and return the
    /// new movie's id.
    pub async fn add_movie_to_user(
        &self,
        user_id: i32,
        title: &str,
        year: Option<i32>,
    ) -> AppResult<i32> {
        let movie = self.add_movie(user_id, title, year, None, None).await?;
        Ok(movie.id)
    }

    /// Overwrites title, year, director and genre of an existing movie.
    /// Ownership (`user_id`) is not transferable.
    pub async fn update_movie(
        &self,
        movie_id: i32,
        title: &str,
        year: Option<i32>,
        director_id: Option<i32>,
        genre_id: Option<i32>,
    ) -> AppResult<movie::Model> {
        let title = required(title, "title")?;
        let existing = movie::Entity::find_by_id(movie_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("movie"))?;
        ensure_movie_refs(&self.db, director_id, genre_id).await?;

        let mut active: movie::ActiveModel = existing.into();
        active.title = Set(title);
        active.year = Set(year);
        active.director_id = Set(director_id);
        active.genre_id = Set(genre_id);
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_movie(&self, movie_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        movie::Entity::find_by_id(movie_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("movie"))?;

        review::Entity::delete_many()
            .filter(review::Column::MovieId.eq(movie_id))
            .exec(&txn)
            .await?;
        movie::Entity::delete_by_id(movie_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    // --- directors ---

    pub async fn get_all_directors(&self) -> AppResult<Vec<director::Model>> {
        Ok(director::Entity::find().all(&self.db).await?)
    }

    pub async fn get_director_by_id(&self, director_id: i32) -> AppResult<Option<director::Model>> {
        Ok(director::Entity::find_by_id(director_id).one(&self.db).await?)
    }

    pub async fn add_director(
        &self,
        name: &str,
        birth_date: Option<&str>,
    ) -> AppResult<director::Model> {
        let name = required(name, "name")?;
        let model = director::ActiveModel {
            name: Set(name),
            birth_date: Set(birth_date.map(str::to_string)),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn delete_director(&self, director_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        director::Entity::find_by_id(director_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("director"))?;

        delete_movies_and_reviews(&txn, movie::Column::DirectorId, director_id).await?;
        director::Entity::delete_by_id(director_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    // --- genres ---

    pub async fn get_all_genres(&self) -> AppResult<Vec<genre::Model>> {
        Ok(genre::Entity::find().all(&self.db).await?)
    }

    pub async fn get_genre_by_id(&self, genre_id: i32) -> AppResult<Option<genre::Model>> {
        Ok(genre::Entity::find_by_id(genre_id).one(&self.db).await?)
    }

    /// Genre names are unique; a duplicate surfaces the database's
    /// constraint error.
    pub async fn add_genre(&self, name: &str) -> AppResult<genre::Model> {
        let name = required(name, "name")?;
        let model = genre::ActiveModel { name: Set(name), ..Default::default() };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn delete_genre(&self, genre_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        genre::Entity::find_by_id(genre_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("genre"))?;

        delete_movies_and_reviews(&txn, movie::Column::GenreId, genre_id).await?;
        genre::Entity::delete_by_id(genre_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    // --- reviews ---

    pub async fn add_review(
        &self,
        user_id: i32,
        movie_id: i32,
        text: Option<&str>,
        rating: i32,
    ) -> AppResult<review::Model> {
        ensure_user_exists(&self.db, user_id).await?;
        if movie::Entity::find_by_id(movie_id).one(&self.db).await?.is_none() {
            return Err(AppError::NotFound("movie"));
        }

        let model = review::ActiveModel {
            user_id: Set(user_id),
            movie_id: Set(movie_id),
            rating: Set(rating),
            text: Set(text.map(str::to_string)),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Reviews for a movie, oldest first, each with the author's name
    /// resolved in the same query.
    pub async fn get_reviews_for_movie(&self, movie_id: i32) -> AppResult<Vec<ReviewWithAuthor>> {
        let rows = review::Entity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .find_also_related(user::Entity)
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(review, author)| ReviewWithAuthor {
                author_name: author.map(|u| u.name).unwrap_or_default(),
                review,
            })
            .collect())
    }

    pub async fn get_reviews_by_user(&self, user_id: i32) -> AppResult<Vec<review::Model>> {
        Ok(review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?)
    }

    /// Drops and recreates the whole schema. Test setup only.
    pub async fn reset_database(&self) -> AppResult<()> {
        Migrator::fresh(&self.db).await?;
        Ok(())
    }
}

fn required(value: &str, field: &'static str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::MissingField(field));
    }
    Ok(value.to_string())
}

async fn ensure_user_exists<C: ConnectionTrait>(conn: &C, user_id: i32) -> AppResult<()> {
    if user::Entity::find_by_id(user_id).one(conn).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}

async fn ensure_movie_refs<C: ConnectionTrait>(
    conn: &C,
    director_id: Option<i32>,
    genre_id: Option<i32>,
) -> AppResult<()> {
    if let Some(id) = director_id {
        if director::Entity::find_by_id(id).one(conn).await?.is_none() {
            return Err(AppError::NotFound("director"));
        }
    }
    if let Some(id) = genre_id {
        if genre::Entity::find_by_id(id).one(conn).await?.is_none() {
            return Err(AppError::NotFound("genre"));
        }
    }
    Ok(())
}

/// Deletes all movies matching `column = id`, and their reviews first.
async fn delete_movies_and_reviews<C: ConnectionTrait>(
    conn: &C,
    column: movie::Column,
    id: i32,
) -> AppResult<()> {
    let movie_ids: Vec<i32> = movie::Entity::find()
        .filter(column.eq(id))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();

    review::Entity::delete_many()
        .filter(review::Column::MovieId.is_in(movie_ids))
        .exec(conn)
        .await?;
    movie::Entity::delete_many().filter(column.eq(id)).exec(conn).await?;
    Ok(())
}
