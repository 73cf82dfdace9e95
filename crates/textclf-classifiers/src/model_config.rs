//! Model loading options

use candle_core::Device;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use textclf_core::{Error, Result};

/// Where and how to load the served model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Artifact directory holding `config.json`, weights and tokenizer files
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl ModelOptions {
    /// Options for a local artifact directory with default inference settings
    pub fn from_dir(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            inference: InferenceConfig::default(),
        }
    }

    /// Path of the artifact's `config.json`
    pub fn config_path(&self) -> PathBuf {
        self.model_dir.join("config.json")
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("saved_model")
}

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, cuda:N, metal)
    #[serde(default)]
    pub device: DeviceType,

    /// Maximum sequence length, special tokens included
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

/// Token budget matching BERT-base position embeddings
pub const DEFAULT_MAX_LENGTH: usize = 512;

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: DeviceType::default(),
            max_length: default_max_length(),
        }
    }
}

/// Device type for inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceType {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU inference
    Cuda(usize),
    /// Metal (Apple Silicon)
    Metal(usize),
}

impl DeviceType {
    /// Create the Candle device
    pub fn create(&self) -> Result<Device> {
        match *self {
            Self::Cpu => Ok(Device::Cpu),
            Self::Cuda(idx) => Device::new_cuda(idx)
                .map_err(|e| Error::classifier(format!("Failed to create CUDA device: {}", e))),
            Self::Metal(idx) => Device::new_metal(idx)
                .map_err(|e| Error::classifier(format!("Failed to create Metal device: {}", e))),
        }
    }
}

impl FromStr for DeviceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let (kind, index) = match lowered.split_once(':') {
            Some((kind, idx)) => {
                let idx = idx
                    .parse::<usize>()
                    .map_err(|_| Error::config(format!("invalid device index in '{}'", s)))?;
                (kind, idx)
            }
            None => (lowered.as_str(), 0),
        };

        match kind {
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda(index)),
            "metal" | "mps" => Ok(Self::Metal(index)),
            _ => Err(Error::config(format!(
                "unknown device '{}' (expected cpu, cuda[:N] or metal[:N])",
                s
            ))),
        }
    }
}

impl TryFrom<String> for DeviceType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DeviceType> for String {
    fn from(value: DeviceType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Cuda(idx) => write!(f, "cuda:{}", idx),
            Self::Metal(idx) => write!(f, "metal:{}", idx),
        }
    }
}
