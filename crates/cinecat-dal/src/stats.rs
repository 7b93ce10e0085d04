use serde::{Deserialize, Serialize};
use sqlx::{Executor, Pool};

use crate::{ChosenDB, error::Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogStats {
    pub total_movies: i64,
    /// rounded to 2 decimal places, `None` when no movie is rated
    pub average_rating: Option<f64>,
    pub total_genres: i64,
    pub total_people: i64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub type StatsRepository = StatsRepositoryImpl<Pool<ChosenDB>>;

pub struct StatsRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> StatsRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn get(&self) -> Result<CatalogStats> {
        const SQL: &str = r#"
        SELECT
            (SELECT count(*) FROM movie),
            (SELECT avg(rating) FROM movie),
            (SELECT count(*) FROM genre),
            (SELECT count(*) FROM person)
        "#;
        let (total_movies, average_rating, total_genres, total_people): (
            i64,
            Option<f64>,
            i64,
            i64,
        ) = sqlx::query_as(SQL).fetch_one(&self.executor).await?;

        Ok(CatalogStats {
            total_movies,
            average_rating: average_rating.map(round2),
            total_genres,
            total_people,
        })
    }
}
