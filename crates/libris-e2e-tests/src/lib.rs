use std::{path::Path, time::Duration};

use anyhow::{Result, anyhow};
use libris_server::{
    config::{Parser, ServerConfig},
    run::{build_state, run_graceful_with_state},
};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tracing::{debug, error};

pub mod rest;

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

/// Keeps temporary data directory and running server alive for the test duration.
pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?;
    let port = port.to_string();
    let args = &[
        "libris-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
            shutdown: None,
        },
    ))
}

pub fn base_url(config: &ServerConfig) -> Result<Url> {
    let url = format!("http://127.0.0.1:{}/", config.port);
    Ok(url.parse()?)
}

pub fn extend_url(url: &Url, segment: impl ToString) -> Url {
    let mut url = url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(&segment.to_string());
    }
    url
}

/// Prepares configuration and database for a test server, server is not started yet.
pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let base_dir = std::env::temp_dir();
    let (config, guard) = test_config(test_name, &base_dir)?;
    // creates data dir and runs migrations, so tests can seed database directly
    let state = build_state(&config).await?;
    state.pool().close().await;
    Ok((config, guard))
}

/// Starts server in background and waits until it is healthy.
pub async fn launch_env(
    config: ServerConfig,
    guard: &mut ConfigGuard,
) -> Result<(reqwest::Client, Url)> {
    let base_url = base_url(&config)?;
    let state = build_state(&config).await?;
    let (tx, rx) = oneshot::channel::<()>();
    guard.shutdown = Some(tx);
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = run_graceful_with_state(config, state, shutdown).await {
            error!("Test server failed: {e}");
        }
    });

    let client = reqwest::Client::new();
    let health_url = base_url.join("health")?;
    for _ in 0..50 {
        match client.get(health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Test server ready at {base_url}");
                return Ok((client, base_url));
            }
            _ => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
    Err(anyhow!("Server did not start in time"))
}
