use std::{fs, path::PathBuf};

use crate::error::Result;
pub use clap::Parser;
use libris_app::state::AppConfig;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "LIBRIS_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "LIBRIS_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "LIBRIS_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db or similar, default is sqlite://[data-dir]/libris.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "LIBRIS_DATA_DIR",
        help = "Data directory (database etc.), default is system default like ~/.local/share/libris"
    )]
    data_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "LIBRIS_DEFAULT_PAGE_SIZE",
        default_value = "100",
        value_parser = clap::value_parser!(u32).range(1..=1000),
        help = "Default page size"
    )]
    pub default_page_size: u32,

    #[arg(long, env = "LIBRIS_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("libris"))
        .unwrap_or_else(|| PathBuf::from("libris"))
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Creates data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<PathBuf> {
        let dir = self.data_dir();
        if !fs::exists(&dir)? {
            fs::create_dir_all(&dir)?;
        } else if !dir.is_dir() {
            anyhow::bail!("Data directory {dir:?} is not a directory");
        }
        Ok(dir)
    }

    /// True when the database lives in the data directory.
    pub fn uses_data_dir(&self) -> bool {
        self.database_url.is_none()
    }

    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            format!("sqlite://{}/libris.db?mode=rwc", self.data_dir().display())
        })
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            default_page_size: config.default_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["libris-server", "--data-dir", "/tmp/libris-test"])
            .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.listen_address, "127.0.0.1");
        assert_eq!(config.default_page_size, 100);
        assert!(!config.cors);
        assert_eq!(
            config.database_url(),
            "sqlite:///tmp/libris-test/libris.db?mode=rwc"
        );
    }

    #[test]
    fn test_page_size_range() {
        let res = ServerConfig::try_parse_from(["libris-server", "--default-page-size", "0"]);
        assert!(res.is_err());
    }
}
