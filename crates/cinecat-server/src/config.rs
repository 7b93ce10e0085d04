use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about = "REST server of the movie catalog")]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "CINECAT_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "CINECAT_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "CINECAT_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/cinecat.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "CINECAT_DATA_DIR",
        help = "Data directory, default is system default like ~/.local/share/cinecat",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "CINECAT_DEFAULT_PAGE_SIZE",
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..=1000),
        help = "Page size of movie listing when per_page is not given"
    )]
    pub default_page_size: u32,

    #[arg(long, env = "CINECAT_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("cinecat"))
        .unwrap_or_else(|| PathBuf::from("cinecat"))
        .to_string_lossy()
        .to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/cinecat.db", self.data_dir))
    }

    pub fn app_config(&self) -> cinecat_app::state::AppConfig {
        cinecat_app::state::AppConfig {
            default_page_size: self.default_page_size,
        }
    }
}
