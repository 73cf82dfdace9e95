//! Classifier trait and common types

use async_trait::async_trait;
use textclf_core::Result;

use crate::family::ModelFamily;

/// Trait for all sequence classifiers served by textclf
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn predict(&self, text: &str) -> Result<Prediction>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Architecture family backing this classifier
    fn family(&self) -> ModelFamily;
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index of the winning class
    pub class_index: usize,

    /// Label name for `class_index` (from `id2label`, or `LABEL_<i>`)
    pub label: String,

    /// Raw head outputs the class was picked from
    pub logits: Vec<f32>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(class_index: usize, label: impl Into<String>) -> Self {
        Self {
            class_index,
            label: label.into(),
            logits: Vec::new(),
            latency_us: 0,
        }
    }
}

/// Index of the largest logit.
///
/// Ties resolve to the lowest index. NaN entries never win unless every
/// entry is NaN, in which case index 0 is returned.
pub fn argmax(logits: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, &value) in logits.iter().enumerate() {
        match best {
            None => best = Some((idx, value)),
            Some((_, current)) if current.is_nan() && !value.is_nan() => {
                best = Some((idx, value))
            }
            Some((_, current)) if value > current => best = Some((idx, value)),
            _ => {}
        }
    }

    best.map(|(idx, _)| idx)
}
