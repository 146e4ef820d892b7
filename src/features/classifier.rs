//! Scene classifier seam
//!
//! Classifiers are trained and persisted elsewhere; this module only
//! defines what the pipeline needs from one and how its class
//! probabilities turn into a [`SceneCategory`].

use crate::constants::classifier::UNKNOWN_PROBABILITY_THRESHOLD;
use crate::error::{AnalysisError, Result};
use crate::features::vector::FeatureVector;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::warn;

/// A pretrained probabilistic scene classifier
pub trait SceneClassifier: Send + Sync {
    /// Feature names in the order the model expects its input row
    fn feature_names(&self) -> &[String];

    /// Class labels, aligned with the probabilities returned by `predict_proba`
    fn classes(&self) -> &[String];

    /// Class probabilities of one aligned feature row
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>>;
}

/// Outcome of scene categorization
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCategory {
    /// The most probable class
    Known(String),
    /// No class is probable enough
    Unknown,
    /// No classifier is loaded
    NoModel,
    /// The classifier failed on this row
    Failed(String),
}

impl SceneCategory {
    pub fn label(&self) -> String {
        match self {
            SceneCategory::Known(label) => label.clone(),
            SceneCategory::Unknown => "unknown".to_string(),
            SceneCategory::NoModel => "no model".to_string(),
            SceneCategory::Failed(message) => format!("Classifier error: {}", message),
        }
    }
}

impl fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for SceneCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Lay the vector out in the model's feature order, 0.0 for unknown names
pub fn align_features(vector: &FeatureVector, names: &[String]) -> Vec<f64> {
    vector.aligned(names)
}

/// Categorize one feature vector
///
/// Never fails: classifier errors become [`SceneCategory::Failed`].
pub fn categorize(classifier: Option<&dyn SceneClassifier>, vector: &FeatureVector) -> SceneCategory {
    let Some(classifier) = classifier else {
        return SceneCategory::NoModel;
    };

    match most_probable(classifier, vector) {
        Ok((label, probability)) if probability >= UNKNOWN_PROBABILITY_THRESHOLD => {
            SceneCategory::Known(label)
        }
        Ok(_) => SceneCategory::Unknown,
        Err(error) => {
            warn!(%error, "scene classification failed");
            SceneCategory::Failed(error.to_string())
        }
    }
}

/// Class with the highest probability; ties go to the first class
fn most_probable(classifier: &dyn SceneClassifier, vector: &FeatureVector) -> Result<(String, f64)> {
    let row = align_features(vector, classifier.feature_names());
    let probabilities = classifier.predict_proba(&row)?;
    let classes = classifier.classes();
    if probabilities.len() != classes.len() {
        return Err(AnalysisError::ClassifierError {
            message: format!(
                "{} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            ),
        });
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, &p) in probabilities.iter().enumerate() {
        if p.is_nan() {
            return Err(AnalysisError::ClassifierError {
                message: format!("probability of class {} is NaN", classes[index]),
            });
        }
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((index, p)),
        }
    }

    best.map(|(index, p)| (classes[index].clone(), p))
        .ok_or_else(|| AnalysisError::ClassifierError {
            message: "classifier has no classes".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier {
        names: Vec<String>,
        classes: Vec<String>,
        probabilities: Vec<f64>,
    }

    impl FixedClassifier {
        fn new(probabilities: Vec<f64>) -> Self {
            Self {
                names: vec!["avg_hue".into(), "not_a_feature".into()],
                classes: vec!["forest".into(), "sea".into(), "city".into()],
                probabilities,
            }
        }
    }

    impl SceneClassifier for FixedClassifier {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
            if row.len() != self.names.len() {
                return Err(AnalysisError::ClassifierError {
                    message: "row length mismatch".into(),
                });
            }
            Ok(self.probabilities.clone())
        }
    }

    fn vector() -> FeatureVector {
        let mut v = FeatureVector::with_schema_defaults();
        v.set("avg_hue", 120.0);
        v
    }

    #[test]
    fn test_align_features() {
        let names = vec!["not_a_feature".to_string(), "avg_hue".to_string()];
        assert_eq!(align_features(&vector(), &names), vec![0.0, 120.0]);
    }

    #[test]
    fn test_known_category() {
        let model = FixedClassifier::new(vec![0.2, 0.7, 0.1]);
        assert_eq!(
            categorize(Some(&model), &vector()),
            SceneCategory::Known("sea".into())
        );
    }

    #[test]
    fn test_unknown_below_threshold() {
        let model = FixedClassifier::new(vec![0.34, 0.33, 0.33]);
        assert_eq!(categorize(Some(&model), &vector()), SceneCategory::Unknown);

        let model = FixedClassifier::new(vec![0.35, 0.30, 0.35]);
        assert_eq!(
            categorize(Some(&model), &vector()),
            SceneCategory::Known("forest".into())
        );
    }

    #[test]
    fn test_no_model() {
        assert_eq!(categorize(None, &vector()), SceneCategory::NoModel);
        assert_eq!(SceneCategory::NoModel.label(), "no model");
    }

    #[test]
    fn test_mismatched_output_fails() {
        let model = FixedClassifier::new(vec![1.0]);
        let category = categorize(Some(&model), &vector());
        assert!(matches!(category, SceneCategory::Failed(_)));
        assert!(category.label().starts_with("Classifier error"));
    }
}
