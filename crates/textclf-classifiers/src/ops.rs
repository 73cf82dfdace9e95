//! Tensor plumbing shared by the sequence classifiers

use crate::classifier::{argmax, Prediction};
use candle_core::{Device, IndexOp, Tensor, WithDType};
use std::time::Instant;
use textclf_core::{Error, Result};

/// Build a `(1, seq_len)` tensor from one encoded sequence
pub(crate) fn batch_of_one<T: WithDType>(values: &[T], device: &Device, what: &str) -> Result<Tensor> {
    Tensor::new(values, device)
        .map_err(|e| Error::classifier(format!("Failed to create {} tensor: {}", what, e)))?
        .unsqueeze(0)
        .map_err(|e| Error::classifier(format!("Failed to unsqueeze {}: {}", what, e)))
}

/// Hidden state of the first (`[CLS]`) token as a `(1, hidden)` tensor
pub(crate) fn cls_state(hidden_states: &Tensor) -> Result<Tensor> {
    hidden_states
        .i((0, 0, ..))
        .map_err(|e| Error::classifier(format!("Failed to get CLS token: {}", e)))?
        .unsqueeze(0)
        .map_err(|e| Error::classifier(format!("Failed to unsqueeze CLS: {}", e)))
}

/// Flatten `(1, num_labels)` logits
pub(crate) fn logits_to_vec(logits: &Tensor) -> Result<Vec<f32>> {
    logits
        .squeeze(0)
        .map_err(|e| Error::classifier(format!("Squeeze failed: {}", e)))?
        .to_vec1::<f32>()
        .map_err(|e| Error::classifier(format!("Failed to convert logits to vec: {}", e)))
}

/// Turn raw logits into a prediction
pub(crate) fn build_prediction(logits: Vec<f32>, labels: &[String], start: Instant) -> Result<Prediction> {
    let class_index =
        argmax(&logits).ok_or_else(|| Error::classifier("Model produced no logits"))?;

    let label = labels
        .get(class_index)
        .cloned()
        .unwrap_or_else(|| format!("LABEL_{}", class_index));

    Ok(Prediction {
        class_index,
        label,
        logits,
        latency_us: start.elapsed().as_micros() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_of_one_shape() {
        let ids = [101u32, 7592, 102];
        let tensor = batch_of_one(&ids, &Device::Cpu, "input ids").unwrap();
        assert_eq!(tensor.dims(), &[1, 3]);
    }

    #[test]
    fn test_cls_state_takes_first_token() {
        let hidden = Tensor::new(&[[[1f32, 2.0], [3.0, 4.0], [5.0, 6.0]]], &Device::Cpu).unwrap();
        let cls = cls_state(&hidden).unwrap();
        assert_eq!(cls.dims(), &[1, 2]);
        assert_eq!(cls.to_vec2::<f32>().unwrap(), vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn test_build_prediction_labels() {
        let labels = vec!["negative".to_string(), "positive".to_string()];
        let logits = logits_to_vec(&Tensor::new(&[[-0.3f32, 1.7]], &Device::Cpu).unwrap()).unwrap();

        let prediction = build_prediction(logits, &labels, Instant::now()).unwrap();
        assert_eq!(prediction.class_index, 1);
        assert_eq!(prediction.label, "positive");
        assert_eq!(prediction.logits, vec![-0.3, 1.7]);

        let prediction = build_prediction(vec![0.0, 0.1, 0.9], &labels, Instant::now()).unwrap();
        assert_eq!(prediction.label, "LABEL_2");
    }

    #[test]
    fn test_build_prediction_empty_logits() {
        assert!(build_prediction(Vec::new(), &[], Instant::now()).is_err());
    }
}
