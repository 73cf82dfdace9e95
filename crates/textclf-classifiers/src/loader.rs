//! Model loading from an artifact directory
//!
//! `load_classifier` reads `config.json`, selects the architecture from its
//! `model_type`, and builds the matching tokenizer/model pairing.

use crate::bert::BertSequenceClassifier;
use crate::classifier::Classifier;
use crate::distilbert::DistilBertSequenceClassifier;
use crate::family::{ArtifactConfig, ModelFamily};
use crate::model_config::ModelOptions;
use candle_core::{DType, Device};
use candle_nn::{Linear, VarBuilder};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use textclf_core::{Error, Result};

/// Weight files tried in order
pub const WEIGHT_FILES: [&str; 2] = ["model.safetensors", "pytorch_model.bin"];

/// Load the classifier described by `options`
pub fn load_classifier(options: &ModelOptions) -> Result<Arc<dyn Classifier>> {
    let model_dir = options.model_dir.as_path();
    if !model_dir.is_dir() {
        return Err(Error::config(format!(
            "Model directory does not exist: {}",
            model_dir.display()
        )));
    }

    let artifact = ArtifactConfig::load(options.config_path())?;
    tracing::info!(
        "Loading {} model from {}",
        artifact.family,
        model_dir.display()
    );

    let device = options.inference.device.create()?;
    let vb = load_var_builder(model_dir, &device)?;
    let name = resolved_name(model_dir, artifact.family);
    let max_length = options.inference.max_length;

    let classifier: Arc<dyn Classifier> = match artifact.family {
        ModelFamily::Bert => Arc::new(BertSequenceClassifier::load(
            name, model_dir, &artifact, vb, max_length,
        )?),
        ModelFamily::DistilBert => Arc::new(DistilBertSequenceClassifier::load(
            name, model_dir, &artifact, vb, max_length,
        )?),
    };

    Ok(classifier)
}

fn resolved_name(model_dir: &Path, family: ModelFamily) -> String {
    model_dir
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}-classifier", family))
}

pub(crate) fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        Error::config(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::config(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}

/// Memory-map safetensors weights, falling back to a PyTorch checkpoint
pub fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_path.join(WEIGHT_FILES[0]);
    if safetensors.exists() {
        tracing::debug!("Loading weights from {}", safetensors.display());
        // SAFETY: the file is not modified while the service runs.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)
                .map_err(|e| Error::classifier(format!("Failed to load weights: {}", e)))?
        };
        return Ok(vb);
    }

    let pth = model_path.join(WEIGHT_FILES[1]);
    if pth.exists() {
        tracing::debug!("Loading weights from {}", pth.display());
        return VarBuilder::from_pth(&pth, DType::F32, device)
            .map_err(|e| Error::classifier(format!("Failed to load PyTorch weights: {}", e)));
    }

    Err(Error::classifier(format!(
        "No model weights found in {} (tried {})",
        model_path.display(),
        WEIGHT_FILES.join(", ")
    )))
}

/// Load a dense layer the checkpoint may omit.
///
/// Absent weights give `None`; weights of the wrong shape are an error.
pub(crate) fn optional_linear(
    in_dim: usize,
    out_dim: usize,
    vb: VarBuilder,
    what: &str,
) -> Result<Option<Linear>> {
    if !vb.contains_tensor("weight") {
        return Ok(None);
    }

    candle_nn::linear(in_dim, out_dim, vb)
        .map(Some)
        .map_err(|e| Error::classifier(format!("Failed to load {} ({}x{}): {}", what, out_dim, in_dim, e)))
}

/// Load the trained `classifier` head; a missing head is an error
pub(crate) fn load_classification_head(
    vb: &VarBuilder,
    hidden_size: usize,
    num_labels: usize,
) -> Result<Linear> {
    candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))
        .map(|linear| {
            tracing::info!(
                "Loaded classification head (hidden_size={}, num_labels={})",
                hidden_size,
                num_labels
            );
            linear
        })
        .map_err(|e| {
            Error::classifier(format!(
                "Failed to load classification head 'classifier' ({}x{}): {}",
                num_labels, hidden_size, e
            ))
        })
}
