pub mod migrate;
pub mod seed;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

#[derive(clap::Args, Debug)]
pub struct DatabaseArgs {
    #[arg(
        long,
        env = "CINECAT_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db"
    )]
    pub database_url: String,
}

impl DatabaseArgs {
    /// Connects and makes sure the schema is current
    pub async fn open(&self) -> anyhow::Result<cinecat_dal::Pool> {
        let pool = cinecat_dal::new_pool(&self.database_url).await?;
        cinecat_dal::migrate(&pool).await?;
        Ok(pool)
    }
}
