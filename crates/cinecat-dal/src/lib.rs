pub mod error;
pub mod genre;
pub mod movie;
pub mod patch;
pub mod person;
pub mod role;
pub mod search_key;
pub mod stats;

use std::str::FromStr as _;

pub use error::Error;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

pub async fn new_pool(database_url: &str) -> Result<Pool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct ListingParams {
    pub offset: i64,
    pub limit: i64,
}

impl ListingParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }
}

/// One page of rows together with the size of the whole (unpaginated) result
#[derive(Debug, Clone)]
pub struct Batch<T> {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub rows: Vec<T>,
}

/// Pattern for a substring match with `LIKE ? ESCAPE '\'` against a lowercased key column,
/// wildcards in the searched text are matched literally.
pub(crate) fn like_pattern(text: &str) -> String {
    let text = search_key::search_key(text);
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
