//! textclf Classifiers
//!
//! Transformer sequence classifiers served by textclf.
//!
//! An artifact directory in the HuggingFace layout is loaded once at
//! startup. Its `config.json` `model_type` selects one of two
//! architectures:
//! - `bert`: BERT encoder, pooler, linear head
//! - `distilbert`: DistilBERT encoder, pre-classifier, linear head
//!
//! Text is tokenized with right-side truncation and the predicted class is
//! the argmax over the head's logits.

pub mod bert;
pub mod classifier;
pub mod distilbert;
pub mod family;
pub mod loader;
pub mod model_config;
mod ops;
pub mod tokenizer;

pub use bert::BertSequenceClassifier;
pub use classifier::{argmax, Classifier, Prediction};
pub use distilbert::DistilBertSequenceClassifier;
pub use family::{ArtifactConfig, ModelFamily};
pub use loader::load_classifier;
pub use model_config::{DeviceType, InferenceConfig, ModelOptions, DEFAULT_MAX_LENGTH};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, Prediction};
    pub use crate::family::ModelFamily;
    pub use crate::loader::load_classifier;
    pub use crate::model_config::{DeviceType, InferenceConfig, ModelOptions};
}
