use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokio::fs;
use tracing::{debug, info};

use crate::commands::{DatabaseArgs, Executor};

#[derive(Parser, Debug)]
pub struct SeedCmd {
    #[command(flatten)]
    database: DatabaseArgs,
    #[arg(help = "SQL file with INSERT statements")]
    file: PathBuf,
}

impl Executor for SeedCmd {
    async fn run(self) -> anyhow::Result<()> {
        let sql = fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("Cannot read fixture {}", self.file.display()))?;
        let pool = self.database.open().await?;
        seed(&pool, &sql).await?;
        info!("Loaded {} into database", self.file.display());
        pool.close().await;
        Ok(())
    }
}

/// Runs all statements in one transaction, nothing is stored if any of them fails.
/// Search keys of inserted rows are filled in the same transaction.
pub async fn seed(pool: &cinecat_dal::Pool, sql: &str) -> anyhow::Result<()> {
    let mut transaction = pool.begin().await?;
    sqlx::raw_sql(sql)
        .execute(&mut *transaction)
        .await
        .context("Fixture failed")?;
    let filled = cinecat_dal::search_key::fill_missing(&mut transaction).await?;
    debug!("Filled {filled} search keys");
    transaction.commit().await?;
    Ok(())
}
