use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Pool};

use crate::{ChosenDB, Error, error::Result, like_pattern, search_key::search_key};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateGenre {
    #[garde(length(min = 1, max = 255))]
    pub genre_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct UpdateGenre {
    #[serde(default, deserialize_with = "crate::patch::not_null")]
    #[garde(length(min = 1, max = 255))]
    pub genre_name: Option<String>,
}

pub type GenreRepository = GenreRepositoryImpl<Pool<ChosenDB>>;

pub struct GenreRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> GenreRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateGenre) -> Result<Genre> {
        let result = sqlx::query("INSERT INTO genre (genre_name, genre_name_key) VALUES (?, ?)")
            .bind(&payload.genre_name)
            .bind(search_key(&payload.genre_name))
            .execute(&self.executor)
            .await?;
        Ok(Genre {
            genre_id: result.last_insert_rowid(),
            genre_name: payload.genre_name,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Genre> {
        sqlx::query_as::<_, Genre>("SELECT genre_id, genre_name FROM genre WHERE genre_id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Genre".to_string()))
    }

    /// Single statement, so the update either applies fully or not at all
    pub async fn update(&self, id: i64, payload: UpdateGenre) -> Result<Genre> {
        if let Some(genre_name) = payload.genre_name {
            let res = sqlx::query(
                "UPDATE genre SET genre_name = ?, genre_name_key = ? WHERE genre_id = ?",
            )
            .bind(&genre_name)
            .bind(search_key(&genre_name))
            .bind(id)
            .execute(&self.executor)
            .await?;
            if res.rows_affected() == 0 {
                return Err(Error::RecordNotFound("Genre".to_string()));
            }
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM genre WHERE genre_id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Genre".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Genre>> {
        let records = sqlx::query_as::<_, Genre>(
            "SELECT genre_id, genre_name FROM genre ORDER BY genre_name, genre_id",
        )
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn search(&self, text: &str, limit: i64) -> Result<Vec<Genre>> {
        let records = sqlx::query_as::<_, Genre>(
            r"SELECT genre_id, genre_name FROM genre WHERE genre_name_key LIKE ? ESCAPE '\'
            ORDER BY genre_name, genre_id LIMIT ?",
        )
        .bind(like_pattern(text))
        .bind(limit)
        .fetch_all(&self.executor)
        .await?;
        Ok(records)
    }
}
