use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, Executor, Pool, QueryBuilder};

use crate::{ChosenDB, Error, error::Result, like_pattern, search_key::person_key};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Person {
    pub person_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<time::Date>,
    /// "first last"
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PersonShort {
    pub person_id: i64,
    pub name: String,
}

/// A movie the person worked on, with the role they had in it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PersonMovieRole {
    pub movie_id: i64,
    pub title: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreatePerson {
    #[garde(length(min = 1, max = 255))]
    pub first_name: String,
    #[garde(length(min = 1, max = 255))]
    pub last_name: String,
    #[garde(skip)]
    pub dob: Option<time::Date>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct UpdatePerson {
    #[serde(default, deserialize_with = "crate::patch::not_null")]
    #[garde(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "crate::patch::not_null")]
    #[garde(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "crate::patch::some")]
    #[garde(skip)]
    pub dob: Option<Option<time::Date>>,
}

const SELECT_PERSON: &str = "SELECT person_id, first_name, last_name, dob, \
    first_name || ' ' || last_name AS name FROM person WHERE person_id = ?";

pub type PersonRepository = PersonRepositoryImpl<Pool<ChosenDB>>;

pub struct PersonRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> PersonRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB> + Acquire<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreatePerson) -> Result<Person> {
        let result = sqlx::query(
            "INSERT INTO person (first_name, last_name, name_key, dob) VALUES (?, ?, ?, ?)",
        )
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(person_key(&payload.first_name, &payload.last_name))
        .bind(payload.dob)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Person> {
        get(id, &self.executor).await
    }

    pub async fn update(&self, id: i64, payload: UpdatePerson) -> Result<Person> {
        let mut transaction = self.executor.begin().await?;
        get(id, &mut *transaction).await?;

        let mut builder = QueryBuilder::<ChosenDB>::new("UPDATE person SET ");
        let mut fields = builder.separated(", ");
        let mut changed = false;
        let renamed = payload.first_name.is_some() || payload.last_name.is_some();
        if let Some(first_name) = payload.first_name {
            fields.push("first_name = ").push_bind_unseparated(first_name);
            changed = true;
        }
        if let Some(last_name) = payload.last_name {
            fields.push("last_name = ").push_bind_unseparated(last_name);
            changed = true;
        }
        if let Some(dob) = payload.dob {
            fields.push("dob = ").push_bind_unseparated(dob);
            changed = true;
        }

        if changed {
            builder.push(" WHERE person_id = ").push_bind(id);
            builder.build().execute(&mut *transaction).await?;
        }

        let record = get(id, &mut *transaction).await?;
        if renamed {
            sqlx::query("UPDATE person SET name_key = ? WHERE person_id = ?")
                .bind(person_key(&record.first_name, &record.last_name))
                .bind(id)
                .execute(&mut *transaction)
                .await?;
        }
        transaction.commit().await?;
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM person WHERE person_id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Person".to_string()))
        } else {
            Ok(())
        }
    }

    /// People whose "first last" name contains `name` (all people if `None`), in id order
    pub async fn list(&self, name: Option<&str>, limit: i64) -> Result<Vec<PersonShort>> {
        let mut builder = QueryBuilder::<ChosenDB>::new(
            "SELECT person_id, first_name || ' ' || last_name AS name FROM person",
        );
        if let Some(name) = name {
            builder
                .push(" WHERE name_key LIKE ")
                .push_bind(like_pattern(name))
                .push(r" ESCAPE '\'");
        }
        builder.push(" ORDER BY person_id LIMIT ").push_bind(limit);

        let records = builder
            .build_query_as::<PersonShort>()
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }

    /// Movies of a person with their role. Inner joins drop association rows
    /// whose movie or role no longer exists.
    pub async fn movies(&self, person_id: i64) -> Result<Vec<PersonMovieRole>> {
        const SQL: &str = r#"
        SELECT m.movie_id, m.title, r.role_name AS role
        FROM movie_person mp
        JOIN movie m ON m.movie_id = mp.movie_id
        JOIN role r ON r.role_id = mp.role_id
        WHERE mp.person_id = ?
        ORDER BY mp.rowid
        "#;
        let records = sqlx::query_as::<_, PersonMovieRole>(SQL)
            .bind(person_id)
            .fetch_all(&self.executor)
            .await?;
        Ok(records)
    }
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Person>
where
    E: Executor<'c, Database = ChosenDB>,
{
    sqlx::query_as::<_, Person>(SELECT_PERSON)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound("Person".to_string()))
}
