//! DistilBERT sequence classifier
//!
//! Mirrors `DistilBertForSequenceClassification`: encoder, `pre_classifier`
//! (dense + ReLU over the `[CLS]` state) and a linear classification head.

use crate::bert::clamp_max_length;
use crate::classifier::{Classifier, Prediction};
use crate::family::{ArtifactConfig, ModelFamily};
use crate::loader::{load_classification_head, optional_linear, parse_json_config};
use crate::ops::{batch_of_one, build_prediction, cls_state, logits_to_vec};
use crate::tokenizer::{encode, load_tokenizer};
use async_trait::async_trait;
use candle_core::Device;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;
use textclf_core::{Error, Result};
use tokenizers::Tokenizer;

/// Dimensions read straight from `config.json`
#[derive(Debug, Deserialize)]
struct DistilBertDims {
    #[serde(default, alias = "hidden_size")]
    dim: Option<usize>,
    #[serde(default)]
    max_position_embeddings: Option<usize>,
}

pub struct DistilBertSequenceClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
}

impl DistilBertSequenceClassifier {
    pub(crate) fn load(
        name: String,
        model_dir: &Path,
        artifact: &ArtifactConfig,
        vb: VarBuilder<'static>,
        max_length: usize,
    ) -> Result<Self> {
        let config: DistilBertConfig = parse_json_config(&artifact.path)?;
        let dims: DistilBertDims = parse_json_config(&artifact.path)?;
        let hidden_size = dims.dim.unwrap_or(768);
        let max_length = clamp_max_length(max_length, dims.max_position_embeddings.unwrap_or(512));

        let tokenizer = load_tokenizer(model_dir, ModelFamily::DistilBert, max_length)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .map_err(|e| Error::classifier(format!("Failed to load DistilBERT model: {}", e)))?;

        let pre_classifier =
            optional_linear(hidden_size, hidden_size, vb.pp("pre_classifier"), "pre_classifier")?;
        if pre_classifier.is_some() {
            tracing::info!("Loaded pre_classifier layer (hidden_size={})", hidden_size);
        }

        let classifier = load_classification_head(&vb, hidden_size, artifact.num_labels())?;

        tracing::info!(
            "Loaded DistilBERT classifier with {} labels: {:?}",
            artifact.num_labels(),
            artifact.labels()
        );

        Ok(Self {
            name,
            tokenizer,
            model,
            pre_classifier,
            classifier,
            device: vb.device().clone(),
            labels: artifact.labels().to_vec(),
        })
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = encode(&self.tokenizer, text)?;
        tracing::debug!("Encoded {} tokens", encoding.len());

        let input_ids_i64: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = batch_of_one(&input_ids_i64, &self.device, "input ids")?;

        // DistilBERT masks positions where the mask is 1, the inverse of the
        // tokenizer's attention mask.
        let mask_inverted: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| u8::from(x == 0))
            .collect();
        let attention_mask = batch_of_one(&mask_inverted, &self.device, "attention mask")?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {}", e)))?;

        let cls = cls_state(&hidden_states)?;
        let pooled = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier
                .forward(&cls)
                .and_then(|t| t.relu())
                .map_err(|e| Error::classifier(format!("Pre-classifier failed: {}", e)))?,
            None => cls,
        };

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::classifier(format!("Classification head failed: {}", e)))?;

        logits_to_vec(&logits)
    }
}

#[async_trait]
impl Classifier for DistilBertSequenceClassifier {
    async fn predict(&self, text: &str) -> Result<Prediction> {
        let start = Instant::now();
        let logits = self.logits(text)?;
        build_prediction(logits, &self.labels, start)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::DistilBert
    }
}
