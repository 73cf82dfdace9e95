//! Model family selection from the artifact's `config.json`
//!
//! The artifact directory follows the HuggingFace layout: a `config.json`
//! whose `model_type` field names the architecture. Only BERT and
//! DistilBERT are served; anything else is rejected at startup instead of
//! being loaded with the wrong architecture.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use textclf_core::{Error, Result};

/// Supported transformer architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// BERT encoder with pooler and linear head
    Bert,
    /// DistilBERT encoder with pre-classifier and linear head
    DistilBert,
}

impl ModelFamily {
    /// All accepted `model_type` values
    pub const ACCEPTED: [&'static str; 2] = ["bert", "distilbert"];

    /// The `model_type` string for this family
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bert => "bert",
            Self::DistilBert => "distilbert",
        }
    }

    /// Hub repository whose tokenizer pairs with this family when the
    /// artifact directory ships no tokenizer files
    pub fn base_tokenizer_repo(&self) -> &'static str {
        match self {
            Self::Bert => "bert-base-uncased",
            Self::DistilBert => "distilbert-base-uncased",
        }
    }
}

impl FromStr for ModelFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bert" => Ok(Self::Bert),
            "distilbert" => Ok(Self::DistilBert),
            other => Err(Error::config(format!(
                "unsupported model_type '{}' (expected one of: {})",
                other,
                Self::ACCEPTED.join(", ")
            ))),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of `config.json` the service itself consumes.
///
/// Architecture hyper-parameters are parsed separately by the Candle config
/// types when the model is built.
#[derive(Debug, Deserialize)]
struct RawArtifactConfig {
    model_type: Option<String>,
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
    #[serde(default)]
    num_labels: Option<usize>,
}

/// Validated view of the artifact configuration
#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Path of the `config.json` this was read from
    pub path: PathBuf,

    /// Selected architecture
    pub family: ModelFamily,

    labels: Vec<String>,
}

impl ArtifactConfig {
    /// Read and validate `config.json`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&contents, path)
    }

    /// Parse and validate `config.json` contents
    pub fn from_json(contents: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw: RawArtifactConfig = serde_json::from_str(contents).map_err(|e| {
            Error::config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let model_type = raw.model_type.ok_or_else(|| {
            Error::config(format!("{} has no model_type field", path.display()))
        })?;
        let family = model_type.parse::<ModelFamily>()?;
        let labels = resolve_labels(raw.id2label, raw.num_labels)?;

        Ok(Self {
            path,
            family,
            labels,
        })
    }

    /// Number of output classes
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Label names ordered by class index
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label for a class index
    pub fn label(&self, idx: usize) -> String {
        self.labels
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{}", idx))
    }
}

/// Upper bound on the number of classes a head may declare
pub const MAX_LABELS: usize = 65_536;

fn resolve_labels(
    id2label: Option<HashMap<String, String>>,
    num_labels: Option<usize>,
) -> Result<Vec<String>> {
    if let Some(n) = num_labels.filter(|&n| n > MAX_LABELS) {
        return Err(Error::config(format!(
            "num_labels {} exceeds the limit of {}",
            n, MAX_LABELS
        )));
    }

    let id2label = match id2label {
        Some(map) if !map.is_empty() => map,
        _ => {
            let n = num_labels.unwrap_or(2);
            if n == 0 {
                return Err(Error::config("num_labels must be at least 1"));
            }
            return Ok((0..n).map(|idx| format!("LABEL_{}", idx)).collect());
        }
    };

    let mut indexed = HashMap::with_capacity(id2label.len());
    for (key, label) in id2label {
        let idx: usize = key
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("id2label key '{}' is not an index", key)))?;
        if idx >= MAX_LABELS {
            return Err(Error::config(format!(
                "id2label index {} exceeds the limit of {} labels",
                idx, MAX_LABELS
            )));
        }
        indexed.insert(idx, label);
    }

    let n = indexed
        .keys()
        .map(|idx| idx + 1)
        .max()
        .unwrap_or(0)
        .max(num_labels.unwrap_or(0));
    Ok((0..n)
        .map(|idx| {
            indexed
                .remove(&idx)
                .unwrap_or_else(|| format!("LABEL_{}", idx))
        })
        .collect())
}
