//! Application state shared across all requests

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use textclf_classifiers::{load_classifier, Classifier};
use tracing::{error, info};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// The one model instance, shared without locking
    pub classifier: Arc<dyn Classifier>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Load the configured model.
    ///
    /// Blocks while weights are mapped and the tokenizer is built; call it
    /// from a blocking context.
    pub fn load(config: ServerConfig) -> anyhow::Result<Self> {
        info!(
            "Loading model from {}",
            config.model.model_dir.display()
        );

        let classifier = load_classifier(&config.model).map_err(|e| {
            error!("Model loading failed: {}", e);
            e
        })?;

        info!(
            "Model '{}' ({}) loaded successfully",
            classifier.name(),
            classifier.family()
        );

        Ok(Self::with_classifier(config, classifier))
    }

    /// Build state around an already constructed classifier
    pub fn with_classifier(config: ServerConfig, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            metrics_handle: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(model_dir: &std::path::Path) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.model.model_dir = model_dir.to_path_buf();
        config
    }

    #[test]
    fn test_malformed_artifact_config_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ model_type: bert").unwrap();

        let err = AppState::load(config_for(dir.path())).err().unwrap();
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn test_unknown_model_type_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), r#"{"model_type": "gpt2"}"#).unwrap();

        let err = AppState::load(config_for(dir.path())).err().unwrap();
        assert!(err.to_string().contains("gpt2"));
    }

    #[test]
    fn test_missing_model_dir_fails_load() {
        let dir = tempfile::tempdir().unwrap();

        assert!(AppState::load(config_for(&dir.path().join("saved_model"))).is_err());
    }
}
