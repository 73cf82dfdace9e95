//! Tiny randomly initialised artifacts for exercising the real loaders.

#![allow(dead_code)]

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use serde_json::json;
use std::path::Path;

pub const VOCAB: [&str; 12] = [
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "the", "movie", "was", "great", "awful",
    "hello", "world",
];

pub const HIDDEN: usize = 8;
pub const MAX_POSITIONS: usize = 16;

pub fn write_vocab(dir: &Path) {
    std::fs::write(dir.join("vocab.txt"), VOCAB.join("\n")).unwrap();
}

pub fn token_id(token: &str) -> u32 {
    VOCAB.iter().position(|t| *t == token).unwrap() as u32
}

fn id2label(num_labels: usize) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = (0..num_labels)
        .map(|idx| (idx.to_string(), json!(format!("class_{}", idx))))
        .collect();
    serde_json::Value::Object(map)
}

/// Write `config.json`, `vocab.txt` and random `model.safetensors` for a BERT classifier
pub fn write_tiny_bert(dir: &Path, num_labels: usize) {
    write_tiny_bert_with_pooler(dir, num_labels, Some(HIDDEN));
}

/// Like `write_tiny_bert`, with a pooler of `pooler_out` outputs or none at all
pub fn write_tiny_bert_with_pooler(dir: &Path, num_labels: usize, pooler_out: Option<usize>) {
    let config = json!({
        "model_type": "bert",
        "vocab_size": VOCAB.len(),
        "hidden_size": HIDDEN,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "intermediate_size": 16,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.1,
        "max_position_embeddings": MAX_POSITIONS,
        "type_vocab_size": 2,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-12,
        "pad_token_id": 0,
        "classifier_dropout": null,
        "id2label": id2label(num_labels),
    });
    std::fs::write(dir.join("config.json"), config.to_string()).unwrap();
    write_vocab(dir);

    let bert_config: BertConfig = serde_json::from_value(config).unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    BertModel::load(vb.pp("bert"), &bert_config).unwrap();
    if let Some(out) = pooler_out {
        candle_nn::linear(HIDDEN, out, vb.pp("bert").pp("pooler").pp("dense")).unwrap();
    }
    candle_nn::linear(HIDDEN, num_labels, vb.pp("classifier")).unwrap();
    varmap.save(dir.join("model.safetensors")).unwrap();
}

/// Write `config.json`, `vocab.txt` and random `model.safetensors` for a DistilBERT classifier
pub fn write_tiny_distilbert(dir: &Path, num_labels: usize) {
    let config = json!({
        "model_type": "distilbert",
        "vocab_size": VOCAB.len(),
        "dim": HIDDEN,
        "n_layers": 1,
        "n_heads": 2,
        "hidden_dim": 16,
        "activation": "gelu",
        "max_position_embeddings": MAX_POSITIONS,
        "initializer_range": 0.02,
        "pad_token_id": 0,
        "id2label": id2label(num_labels),
    });
    std::fs::write(dir.join("config.json"), config.to_string()).unwrap();
    write_vocab(dir);

    let distil_config: DistilBertConfig = serde_json::from_value(config).unwrap();
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    DistilBertModel::load(vb.pp("distilbert"), &distil_config).unwrap();
    candle_nn::linear(HIDDEN, HIDDEN, vb.pp("pre_classifier")).unwrap();
    candle_nn::linear(HIDDEN, num_labels, vb.pp("classifier")).unwrap();
    varmap.save(dir.join("model.safetensors")).unwrap();
}

pub fn long_text(words: usize) -> String {
    ["the", "movie", "was", "great"]
        .iter()
        .cycle()
        .take(words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
