//! Case folded copies of searched text.
//!
//! SQLite `LIKE` folds only ASCII letters. Titles, genre names and person names are therefore
//! also stored lowercased by Rust (`movie.title_key`, `genre.genre_name_key`, `person.name_key`)
//! and searches match a lowercased pattern (see [`crate::like_pattern`]) against these columns.

use sqlx::SqliteConnection;

use crate::error::Result;

pub fn search_key(text: &str) -> String {
    text.to_lowercase()
}

/// Key of the "first last" name
pub fn person_key(first_name: &str, last_name: &str) -> String {
    search_key(&format!("{first_name} {last_name}"))
}

/// Computes keys for rows inserted without them (SQL fixtures, rows from older schema),
/// returns number of updated rows
pub async fn fill_missing(conn: &mut SqliteConnection) -> Result<u64> {
    let mut filled = 0;

    let movies: Vec<(i64, String)> =
        sqlx::query_as("SELECT movie_id, title FROM movie WHERE title_key IS NULL")
            .fetch_all(&mut *conn)
            .await?;
    for (id, title) in movies {
        sqlx::query("UPDATE movie SET title_key = ? WHERE movie_id = ?")
            .bind(search_key(&title))
            .bind(id)
            .execute(&mut *conn)
            .await?;
        filled += 1;
    }

    let genres: Vec<(i64, String)> =
        sqlx::query_as("SELECT genre_id, genre_name FROM genre WHERE genre_name_key IS NULL")
            .fetch_all(&mut *conn)
            .await?;
    for (id, name) in genres {
        sqlx::query("UPDATE genre SET genre_name_key = ? WHERE genre_id = ?")
            .bind(search_key(&name))
            .bind(id)
            .execute(&mut *conn)
            .await?;
        filled += 1;
    }

    let people: Vec<(i64, String, String)> = sqlx::query_as(
        "SELECT person_id, first_name, last_name FROM person WHERE name_key IS NULL",
    )
    .fetch_all(&mut *conn)
    .await?;
    for (id, first_name, last_name) in people {
        sqlx::query("UPDATE person SET name_key = ? WHERE person_id = ?")
            .bind(person_key(&first_name, &last_name))
            .bind(id)
            .execute(&mut *conn)
            .await?;
        filled += 1;
    }

    Ok(filled)
}
