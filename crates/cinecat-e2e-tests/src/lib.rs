pub mod rest;

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};
use cinecat_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use tempfile::TempDir;
use tracing::debug;
use url::Url;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?.to_string();
    let args = &[
        "cinecat-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--no-cors",
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

/// Config with fresh data directory under `test-data` of the current directory
pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let base_dir = std::env::current_dir()?.join("test-data");
    tokio::fs::create_dir_all(&base_dir).await?;
    test_config(test_name, &base_dir)
}

pub fn base_url(config: &ServerConfig) -> Result<Url> {
    Ok(Url::parse(&format!("http://127.0.0.1:{}/", config.port))?)
}

/// Appends path segment(s) to URL, keeping what is already there
pub fn extend_url(url: &Url, segment: impl std::fmt::Display) -> Url {
    let mut url = url.clone();
    let path = format!("{}/{}", url.path().trim_end_matches('/'), segment);
    url.set_path(&path);
    url
}

/// Starts server in background and waits until it answers health checks
pub async fn spawn_server(config: ServerConfig) -> Result<()> {
    let health_url = base_url(&config)?.join("health")?;
    tokio::spawn(async move {
        if let Err(e) = cinecat_server::run(config).await {
            tracing::error!("Server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            other => debug!("Server not ready yet: {:?}", other.map(|r| r.status())),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(anyhow!("Server did not start"))
}

/// Fresh environment with running server, returns client and base URL
pub async fn launch_env(test_name: &str) -> Result<(reqwest::Client, Url, ConfigGuard)> {
    let (config, guard) = prepare_env(test_name).await?;
    let url = base_url(&config)?;
    spawn_server(config).await?;
    Ok((reqwest::Client::new(), url, guard))
}
