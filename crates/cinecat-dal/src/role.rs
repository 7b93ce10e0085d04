use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Pool};

use crate::{ChosenDB, Error, error::Result};

/// Static lookup of what a person did on a movie (Actor, Director ...),
/// rows are provided by migrations.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Role {
    pub role_id: i64,
    pub role_name: String,
}

pub type RoleRepository = RoleRepositoryImpl<Pool<ChosenDB>>;

pub struct RoleRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> RoleRepositoryImpl<E>
where
    for<'a> &'a E: Executor<'c, Database = ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn get(&self, id: i64) -> Result<Role> {
        sqlx::query_as::<_, Role>("SELECT role_id, role_name FROM role WHERE role_id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Role".to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<Role>> {
        let records = sqlx::query_as::<_, Role>("SELECT role_id, role_name FROM role")
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }
}
