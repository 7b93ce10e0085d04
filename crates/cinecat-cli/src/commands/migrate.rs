use clap::Parser;
use tracing::info;

use crate::commands::{DatabaseArgs, Executor};

#[derive(Parser, Debug)]
pub struct MigrateCmd {
    #[command(flatten)]
    database: DatabaseArgs,
}

impl Executor for MigrateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = self.database.open().await?;
        info!("Database {} is up to date", self.database.database_url);
        pool.close().await;
        Ok(())
    }
}
