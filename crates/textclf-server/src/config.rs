//! Server configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use textclf_classifiers::{DeviceType, ModelOptions};

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model artifact and inference settings
    #[serde(default)]
    pub model: ModelOptions,

    /// Cross-origin settings
    #[serde(default)]
    pub cors: CorsConfig,

    /// Largest accepted request body
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(cli)?;
        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) -> anyhow::Result<()> {
        if let Some(model_dir) = &cli.model_dir {
            self.model.model_dir = model_dir.clone();
        }

        if let Some(device) = &cli.device {
            self.model.inference.device = device.parse::<DeviceType>()?;
        }

        if let Some(max_length) = cli.max_length {
            self.model.inference.max_length = max_length;
        }

        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            self.port = port;
        }

        Ok(())
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .listen
            .parse()
            .with_context(|| format!("invalid listen address '{}'", self.listen))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            model: ModelOptions::default(),
            cors: CorsConfig::default(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("textclf-server").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_file() {
        let config = ServerConfig::load(Path::new("/nonexistent/textclf.yaml"), &cli(&[])).unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:5000");
        assert_eq!(config.model.model_dir, PathBuf::from("saved_model"));
        assert_eq!(config.model.inference.max_length, 512);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textclf.yaml");
        std::fs::write(
            &path,
            r#"
listen: "127.0.0.1"
port: 8081
model:
  model_dir: "./models/sst2"
  inference:
    device: "cpu"
    max_length: 128
cors:
  allowed_origins: ["http://localhost:3000"]
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path, &cli(&[])).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
        assert_eq!(config.model.model_dir, PathBuf::from("./models/sst2"));
        assert_eq!(config.model.inference.max_length, 128);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textclf.yaml");
        std::fs::write(&path, "port: 8081\nmodel:\n  model_dir: a\n").unwrap();

        let config = ServerConfig::load(
            &path,
            &cli(&["--port", "9000", "--model-dir", "b", "--max-length", "64"]),
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.model.model_dir, PathBuf::from("b"));
        assert_eq!(config.model.inference.max_length, 64);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textclf.yaml");
        std::fs::write(&path, "port: [not a port").unwrap();

        assert!(ServerConfig::load(&path, &cli(&[])).is_err());
    }

    #[test]
    fn test_bad_device_override() {
        let result = ServerConfig::load(Path::new("/nonexistent.yaml"), &cli(&["--device", "tpu"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_listen_address() {
        let config = ServerConfig {
            listen: "localhost".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
