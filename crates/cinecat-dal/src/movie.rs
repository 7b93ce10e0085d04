use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, QueryBuilder};
use tracing::debug;

use crate::{
    Batch, ChosenDB, Error, ListingParams, error::Result, like_pattern, search_key::search_key,
};

/// Movie without relations, used in listings and as result of mutations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct MovieShort {
    pub movie_id: i64,
    pub title: String,
    pub release_year: Option<i64>,
    /// minutes
    pub duration: Option<i64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub release_year: Option<i64>,
    pub duration: Option<i64>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub people: Vec<MoviePersonRole>,
}

impl Movie {
    pub fn new(movie: MovieShort, genres: Vec<String>, people: Vec<MoviePersonRole>) -> Self {
        Movie {
            movie_id: movie.movie_id,
            title: movie.title,
            release_year: movie.release_year,
            duration: movie.duration,
            rating: movie.rating,
            genres,
            people,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MoviePersonRole {
    pub person_id: i64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateMovie {
    #[garde(length(min = 1, max = 255))]
    pub title: String,
    #[garde(skip)]
    pub release_year: Option<i64>,
    #[garde(skip)]
    pub duration: Option<i64>,
    #[garde(skip)]
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct UpdateMovie {
    #[serde(default, deserialize_with = "crate::patch::not_null")]
    #[garde(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::patch::some")]
    #[garde(skip)]
    pub release_year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::patch::some")]
    #[garde(skip)]
    pub duration: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::patch::some")]
    #[garde(skip)]
    pub rating: Option<Option<f64>>,
}

/// Ratings are kept with one fractional digit
fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieSort {
    #[default]
    Title,
    /// descending, unrated last
    Rating,
    /// descending, unknown year last
    ReleaseYear,
}

impl MovieSort {
    /// Unknown or missing sort keys fall back to title
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("rating") => MovieSort::Rating,
            Some("release_year") => MovieSort::ReleaseYear,
            _ => MovieSort::Title,
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            MovieSort::Title => "m.title ASC, m.movie_id ASC",
            MovieSort::Rating => "m.rating IS NULL, m.rating DESC, m.movie_id ASC",
            MovieSort::ReleaseYear => {
                "m.release_year IS NULL, m.release_year DESC, m.movie_id ASC"
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// case-insensitive substring of title
    pub search: Option<String>,
    /// exact genre name
    pub genre: Option<String>,
    pub sort: MovieSort,
}

impl MovieFilter {
    /// Empty strings mean no filter
    pub fn new(search: Option<String>, genre: Option<String>, sort: MovieSort) -> Self {
        MovieFilter {
            search: search.filter(|s| !s.is_empty()),
            genre: genre.filter(|s| !s.is_empty()),
            sort,
        }
    }

    fn push_from_where(&self, builder: &mut QueryBuilder<'_, ChosenDB>) {
        builder.push(" FROM movie m");
        if self.genre.is_some() {
            builder.push(
                " JOIN movie_genre mg ON mg.movie_id = m.movie_id \
                JOIN genre g ON g.genre_id = mg.genre_id",
            );
        }
        let mut clause = " WHERE ";
        if let Some(search) = &self.search {
            builder
                .push(clause)
                .push("m.title_key LIKE ")
                .push_bind(like_pattern(search))
                .push(r" ESCAPE '\'");
            clause = " AND ";
        }
        if let Some(genre) = &self.genre {
            builder
                .push(clause)
                .push("g.genre_name = ")
                .push_bind(genre.clone());
        }
    }
}

const MOVIE_COLUMNS: &str = "m.movie_id, m.title, m.release_year, m.duration, m.rating";

pub type MovieRepository = MovieRepositoryImpl<Pool<ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateMovie) -> Result<MovieShort> {
        let result = sqlx::query(
            "INSERT INTO movie (title, title_key, release_year, duration, rating) \
            VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(search_key(&payload.title))
        .bind(payload.release_year)
        .bind(payload.duration)
        .bind(payload.rating.map(round_rating))
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<MovieShort> {
        get(id, &self.executor).await
    }

    pub async fn update(&self, id: i64, payload: UpdateMovie) -> Result<MovieShort> {
        let mut transaction = self.executor.begin().await?;
        get(id, &mut *transaction).await?;

        let mut builder = QueryBuilder::<ChosenDB>::new("UPDATE movie SET ");
        let mut fields = builder.separated(", ");
        let mut changed = false;
        if let Some(title) = payload.title {
            fields
                .push("title_key = ")
                .push_bind_unseparated(search_key(&title));
            fields.push("title = ").push_bind_unseparated(title);
            changed = true;
        }
        if let Some(release_year) = payload.release_year {
            fields
                .push("release_year = ")
                .push_bind_unseparated(release_year);
            changed = true;
        }
        if let Some(duration) = payload.duration {
            fields.push("duration = ").push_bind_unseparated(duration);
            changed = true;
        }
        if let Some(rating) = payload.rating {
            fields
                .push("rating = ")
                .push_bind_unseparated(rating.map(round_rating));
            changed = true;
        }

        if changed {
            builder.push(" WHERE movie_id = ").push_bind(id);
            builder.build().execute(&mut *transaction).await?;
        }

        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        Ok(record)
    }

    /// Associations of the movie are removed by the cascade on foreign keys
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM movie WHERE movie_id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Movie".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn list(
        &self,
        filter: &MovieFilter,
        params: ListingParams,
    ) -> Result<Batch<MovieShort>> {
        let mut count_query = QueryBuilder::<ChosenDB>::new("SELECT count(DISTINCT m.movie_id)");
        filter.push_from_where(&mut count_query);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.executor)
            .await?;

        let mut query = QueryBuilder::<ChosenDB>::new("SELECT DISTINCT ");
        query.push(MOVIE_COLUMNS);
        filter.push_from_where(&mut query);
        query
            .push(" ORDER BY ")
            .push(filter.sort.order_by())
            .push(" LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset);
        debug!("Listing movies: {}", query.sql());

        let rows = query
            .build_query_as::<MovieShort>()
            .fetch_all(&self.executor)
            .await?;

        Ok(Batch {
            offset: params.offset,
            limit: params.limit,
            total,
            rows,
        })
    }

    pub async fn search(&self, text: &str, limit: i64) -> Result<Vec<MovieShort>> {
        let filter = MovieFilter::new(Some(text.to_string()), None, MovieSort::Title);
        self.list(&filter, ListingParams::new(0, limit))
            .await
            .map(|batch| batch.rows)
    }

    pub async fn top_rated(&self, limit: i64) -> Result<Vec<MovieShort>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movie m WHERE m.rating IS NOT NULL \
            ORDER BY m.rating DESC, m.movie_id LIMIT ?"
        );
        let records = sqlx::query_as::<_, MovieShort>(&sql)
            .bind(limit)
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    pub async fn list_by_year(&self, year: i64) -> Result<Vec<MovieShort>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movie m WHERE m.release_year = ? \
            ORDER BY m.title, m.movie_id"
        );
        let records = sqlx::query_as::<_, MovieShort>(&sql)
            .bind(year)
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    /// Distinct known release years, newest first
    pub async fn years(&self) -> Result<Vec<i64>> {
        let years: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT release_year FROM movie WHERE release_year IS NOT NULL \
            ORDER BY release_year DESC",
        )
        .fetch_all(&self.executor)
        .await?;
        Ok(years)
    }

    pub async fn list_by_genre(&self, genre_id: i64) -> Result<Vec<MovieShort>> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movie m \
            JOIN movie_genre mg ON mg.movie_id = m.movie_id \
            WHERE mg.genre_id = ? ORDER BY m.title, m.movie_id"
        );
        let records = sqlx::query_as::<_, MovieShort>(&sql)
            .bind(genre_id)
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    pub async fn genre_names(&self, movie_id: i64) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT g.genre_name FROM movie_genre mg \
            JOIN genre g ON g.genre_id = mg.genre_id \
            WHERE mg.movie_id = ? ORDER BY g.genre_name",
        )
        .bind(movie_id)
        .fetch_all(&self.executor)
        .await?;
        Ok(names)
    }

    /// People of the movie with their roles. Inner joins drop association rows
    /// whose person or role no longer exists.
    pub async fn people(&self, movie_id: i64) -> Result<Vec<MoviePersonRole>> {
        const SQL: &str = r#"
        SELECT p.person_id, p.first_name || ' ' || p.last_name AS name, r.role_name AS role
        FROM movie_person mp
        JOIN person p ON p.person_id = mp.person_id
        JOIN role r ON r.role_id = mp.role_id
        WHERE mp.movie_id = ?
        ORDER BY mp.rowid
        "#;
        let records = sqlx::query_as::<_, MoviePersonRole>(SQL)
            .bind(movie_id)
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    pub async fn add_genre(&self, movie_id: i64, genre_id: i64) -> Result<()> {
        let mut transaction = self.executor.begin().await?;
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT movie_id FROM movie_genre WHERE movie_id = ? AND genre_id = ?",
        )
        .bind(movie_id)
        .bind(genre_id)
        .fetch_optional(&mut *transaction)
        .await?;
        if existing.is_some() {
            return Err(Error::DuplicateAssociation(
                "Movie already has this genre".to_string(),
            ));
        }

        sqlx::query("INSERT INTO movie_genre (movie_id, genre_id) VALUES (?, ?)")
            .bind(movie_id)
            .bind(genre_id)
            .execute(&mut *transaction)
            .await?;
        transaction.commit().await?;
        Ok(())
    }

    pub async fn remove_genre(&self, movie_id: i64, genre_id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM movie_genre WHERE movie_id = ? AND genre_id = ?")
            .bind(movie_id)
            .bind(genre_id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Movie genre".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn add_person(&self, movie_id: i64, person_id: i64, role_id: i64) -> Result<()> {
        let mut transaction = self.executor.begin().await?;
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT movie_id FROM movie_person WHERE movie_id = ? AND person_id = ? AND role_id = ?",
        )
        .bind(movie_id)
        .bind(person_id)
        .bind(role_id)
        .fetch_optional(&mut *transaction)
        .await?;
        if existing.is_some() {
            return Err(Error::DuplicateAssociation(
                "Person already has this role in this movie".to_string(),
            ));
        }

        sqlx::query("INSERT INTO movie_person (movie_id, person_id, role_id) VALUES (?, ?, ?)")
            .bind(movie_id)
            .bind(person_id)
            .bind(role_id)
            .execute(&mut *transaction)
            .await?;
        transaction.commit().await?;
        Ok(())
    }

    pub async fn remove_person(&self, movie_id: i64, person_id: i64, role_id: i64) -> Result<()> {
        let res = sqlx::query(
            "DELETE FROM movie_person WHERE movie_id = ? AND person_id = ? AND role_id = ?",
        )
        .bind(movie_id)
        .bind(person_id)
        .bind(role_id)
        .execute(&self.executor)
        .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Movie person role".to_string()))
        } else {
            Ok(())
        }
    }
}

async fn get<'c, E>(id: i64, executor: E) -> Result<MovieShort>
where
    E: Executor<'c, Database = ChosenDB>,
{
    let sql = format!("SELECT {MOVIE_COLUMNS} FROM movie m WHERE m.movie_id = ?");
    sqlx::query_as::<_, MovieShort>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Movie".to_string()))
}
