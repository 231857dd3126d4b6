//! Combines the keyword rules and the statistical classifier.

use serde::{Deserialize, Serialize};

use crate::categorizer::{CategoryLabel, KeywordRuleMatcher, TrainedClassifier};

/// The confidence reported for a keyword rule match.
pub const RULE_CONFIDENCE: f64 = 1.0;
/// The confidence reported for a statistical prediction.
///
/// This is a fixed value below [RULE_CONFIDENCE], not the model's probability.
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

/// Which part of the categorizer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    /// A keyword rule matched.
    Rule,
    /// No rule matched and the statistical classifier was used.
    Ml,
}

/// The category assigned to a description and how it was decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The assigned category.
    pub category: CategoryLabel,
    /// Whether a rule or the classifier decided the category.
    pub source: ClassificationSource,
    /// How sure the categorizer is, in `[0, 1]`.
    pub confidence: f64,
}

/// Assigns a category to free-text transaction descriptions.
///
/// Keyword rules are tried first and the trained classifier handles everything
/// they miss, so every description gets a category. The categorizer is
/// immutable after construction and can be shared between requests.
#[derive(Debug, Clone)]
pub struct Categorizer {
    matcher: KeywordRuleMatcher,
    classifier: TrainedClassifier,
}

impl Categorizer {
    /// Create a categorizer that falls back to `classifier`.
    pub fn new(classifier: TrainedClassifier) -> Self {
        Self {
            matcher: KeywordRuleMatcher::new(),
            classifier,
        }
    }

    /// Categorize `description`.
    pub fn categorize(&self, description: &str) -> ClassificationResult {
        if let Some(category) = self.matcher.find_match(description) {
            tracing::debug!("Rule matched {category} for {description:?}");

            return ClassificationResult {
                category,
                source: ClassificationSource::Rule,
                confidence: RULE_CONFIDENCE,
            };
        }

        let category = self.classifier.predict(description);
        tracing::debug!("No rule matched {description:?}, classifier predicted {category}");

        ClassificationResult {
            category,
            source: ClassificationSource::Ml,
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}
