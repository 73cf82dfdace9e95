//! BERT sequence classifier
//!
//! Mirrors `BertForSequenceClassification`: encoder, pooler (dense + tanh
//! over the `[CLS]` state) and a linear classification head.

use crate::classifier::{Classifier, Prediction};
use crate::family::{ArtifactConfig, ModelFamily};
use crate::loader::{load_classification_head, optional_linear, parse_json_config};
use crate::ops::{batch_of_one, build_prediction, cls_state, logits_to_vec};
use crate::tokenizer::{encode, load_tokenizer};
use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::Path;
use std::time::Instant;
use textclf_core::{Error, Result};
use tokenizers::Tokenizer;

pub struct BertSequenceClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
}

impl BertSequenceClassifier {
    pub(crate) fn load(
        name: String,
        model_dir: &Path,
        artifact: &ArtifactConfig,
        vb: VarBuilder<'static>,
        max_length: usize,
    ) -> Result<Self> {
        let config: BertConfig = parse_json_config(&artifact.path)?;
        let max_length = clamp_max_length(max_length, config.max_position_embeddings);
        let tokenizer = load_tokenizer(model_dir, ModelFamily::Bert, max_length)?;

        let (model, prefix) = load_backbone(&vb, &config)?;
        let pooler_vb = if prefix.is_empty() {
            vb.pp("pooler")
        } else {
            vb.pp(prefix).pp("pooler")
        };
        let pooler = optional_linear(
            config.hidden_size,
            config.hidden_size,
            pooler_vb.pp("dense"),
            "pooler",
        )?;
        if pooler.is_none() {
            tracing::warn!("No pooler weights found, classifying on the raw [CLS] state");
        }

        let classifier =
            load_classification_head(&vb, config.hidden_size, artifact.num_labels())?;

        tracing::info!(
            "Loaded BERT classifier with {} labels: {:?}",
            artifact.num_labels(),
            artifact.labels()
        );

        Ok(Self {
            name,
            tokenizer,
            model,
            pooler,
            classifier,
            device: vb.device().clone(),
            labels: artifact.labels().to_vec(),
        })
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = encode(&self.tokenizer, text)?;
        tracing::debug!("Encoded {} tokens", encoding.len());

        let input_ids = batch_of_one(encoding.get_ids(), &self.device, "input ids")?;
        let token_type_ids = batch_of_one(encoding.get_type_ids(), &self.device, "token type ids")?;
        let attention_mask =
            batch_of_one(encoding.get_attention_mask(), &self.device, "attention mask")?;

        let hidden_states = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::classifier(format!("Model forward pass failed: {}", e)))?;

        let cls = cls_state(&hidden_states)?;
        let pooled = match &self.pooler {
            Some(pooler) => pooler
                .forward(&cls)
                .and_then(|t| t.tanh())
                .map_err(|e| Error::classifier(format!("Pooler failed: {}", e)))?,
            None => cls,
        };

        let logits: Tensor = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::classifier(format!("Classification head failed: {}", e)))?;

        logits_to_vec(&logits)
    }
}

#[async_trait]
impl Classifier for BertSequenceClassifier {
    async fn predict(&self, text: &str) -> Result<Prediction> {
        let start = Instant::now();
        let logits = self.logits(text)?;
        build_prediction(logits, &self.labels, start)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> ModelFamily {
        ModelFamily::Bert
    }
}

fn load_backbone(vb: &VarBuilder, config: &BertConfig) -> Result<(BertModel, &'static str)> {
    let mut errors = Vec::new();

    for prefix in ["bert", ""] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match BertModel::load(vb_prefix, config) {
            Ok(model) => {
                let effective_prefix = if prefix.is_empty() { "<root>" } else { prefix };
                tracing::info!("Loaded BERT backbone from '{}'", effective_prefix);
                return Ok((model, prefix));
            }
            Err(e) => errors.push(format!(
                "{}: {}",
                if prefix.is_empty() { "<root>" } else { prefix },
                e
            )),
        }
    }

    Err(Error::classifier(format!(
        "Failed to load BERT backbone with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

/// Keep the token budget within the position embedding table
pub(crate) fn clamp_max_length(requested: usize, max_positions: usize) -> usize {
    if requested > max_positions {
        tracing::warn!(
            "max_length {} exceeds the model's {} positions, truncating to {}",
            requested,
            max_positions,
            max_positions
        );
        max_positions
    } else {
        requested
    }
}
