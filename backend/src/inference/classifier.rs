use std::path::Path;
use std::sync::Arc;

use ndarray::Array4;

use super::labels::LabelSet;
use super::preprocess::INPUT_SHAPE;
use super::{InferenceError, load_model};

/// A loaded network that maps a preprocessed batch to one score per label.
/// Implementations must be safe to call from several requests at once.
pub trait InferenceModel: Send + Sync {
    fn forward(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    pub index: usize,
    /// Softmax value at the argmax index.
    pub confidence: f32,
}

#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn InferenceModel>,
    labels: Arc<LabelSet>,
}

impl Classifier {
    pub fn new(model: Arc<dyn InferenceModel>, labels: LabelSet) -> Self {
        Self {
            model,
            labels: Arc::new(labels),
        }
    }

    pub fn load(model_path: &Path, labels_path: &Path) -> Result<Self, InferenceError> {
        let labels = LabelSet::load(labels_path)?;
        let model = load_model(model_path)?;
        log::info!(
            "Classifier ready: {} labels ({})",
            labels.len(),
            labels.iter().collect::<Vec<_>>().join(", ")
        );
        Ok(Self::new(model, labels))
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn classify(&self, input: &Array4<f32>) -> Result<ClassificationResult, InferenceError> {
        if input.shape() != &INPUT_SHAPE[..] {
            return Err(InferenceError::InputShape {
                expected: INPUT_SHAPE,
                actual: input.shape().to_vec(),
            });
        }

        let raw = self.model.forward(input)?;
        if raw.len() != self.labels.len() {
            return Err(InferenceError::OutputMismatch {
                expected: self.labels.len(),
                actual: raw.len(),
            });
        }
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite);
        }

        let probabilities = to_probabilities(raw);
        let (index, confidence) = argmax(&probabilities).ok_or(InferenceError::OutputMismatch {
            expected: self.labels.len(),
            actual: 0,
        })?;
        let label = self
            .labels
            .get(index)
            .ok_or(InferenceError::OutputMismatch {
                expected: self.labels.len(),
                actual: probabilities.len(),
            })?
            .to_string();

        Ok(ClassificationResult {
            label,
            index,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}

/// Index and value of the largest entry; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, best_v)) if best_v >= v => best,
            _ => Some((i, v)),
        })
}

pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn is_distribution(values: &[f32]) -> bool {
    let sum: f32 = values.iter().sum();
    values.iter().all(|v| (0.0..=1.0).contains(v)) && (sum - 1.0).abs() < 1e-3
}

// Exported graphs usually end in a softmax layer already; raw logits are
// normalised here so confidence stays a probability either way.
fn to_probabilities(raw: Vec<f32>) -> Vec<f32> {
    if is_distribution(&raw) {
        raw
    } else {
        softmax(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedModel, trait_labels};

    fn classifier(output: Vec<f32>) -> Classifier {
        Classifier::new(Arc::new(FixedModel::new(output)), trait_labels())
    }

    fn input() -> Array4<f32> {
        Array4::from_elem(INPUT_SHAPE, -1.0)
    }

    #[test]
    fn picks_argmax_of_probabilities() {
        let result = classifier(vec![0.1, 0.2, 0.4, 0.2, 0.1])
            .classify(&input())
            .unwrap();
        assert_eq!(result.label, "Extraversion");
        assert_eq!(result.index, 2);
        assert!((result.confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let classifier = classifier(vec![0.05, 0.6, 0.15, 0.1, 0.1]);
        let first = classifier.classify(&input()).unwrap();
        for _ in 0..10 {
            assert_eq!(classifier.classify(&input()).unwrap(), first);
        }
    }

    #[test]
    fn logits_are_normalised_before_argmax() {
        let result = classifier(vec![1.0, 3.0, -2.0, 0.5, 2.0])
            .classify(&input())
            .unwrap();
        assert_eq!(result.label, "Conscientiousness");
        let expected = softmax(&[1.0, 3.0, -2.0, 0.5, 2.0]);
        assert!((result.confidence - expected[1]).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn label_always_comes_from_the_label_set() {
        let outputs = [
            vec![1.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 1.0],
            vec![0.2, 0.2, 0.2, 0.2, 0.2],
            vec![-5.0, -1.0, -3.0, -4.0, -2.0],
        ];
        for output in outputs {
            let classifier = classifier(output);
            let result = classifier.classify(&input()).unwrap();
            assert!(classifier.labels().contains(&result.label));
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn ties_resolve_to_first_index() {
        assert_eq!(argmax(&[0.2, 0.2, 0.2, 0.2, 0.2]), Some((0, 0.2)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn rejects_mismatched_output_length() {
        let err = classifier(vec![0.5, 0.5]).classify(&input()).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::OutputMismatch {
                expected: 5,
                actual: 2
            }
        ));
    }

    #[test]
    fn rejects_non_finite_output() {
        let err = classifier(vec![f32::NAN, 0.1, 0.1, 0.1, 0.1])
            .classify(&input())
            .unwrap_err();
        assert!(matches!(err, InferenceError::NonFinite));
    }

    #[test]
    fn rejects_wrong_input_shape() {
        let err = classifier(vec![0.2; 5])
            .classify(&Array4::zeros((1, 3, 224, 224)))
            .unwrap_err();
        assert!(matches!(err, InferenceError::InputShape { .. }));
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1000.0, 1001.0, 999.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| p.is_finite()));
    }
}
