//! TF-IDF text features for the statistical classifier.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// A sparse feature vector as `(feature index, value)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Split text into lowercase terms of two or more word characters.
pub fn terms(text: &str) -> Vec<String> {
    let lowercase = text.to_lowercase();

    TERM_PATTERN
        .find_iter(&lowercase)
        .map(|term| term.as_str().to_owned())
        .collect()
}

/// Turns text into L2-normalized TF-IDF vectors over a fixed vocabulary.
///
/// Term frequency is the raw count and the inverse document frequency is
/// smoothed, `ln((1 + n) / (1 + df)) + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// The terms seen during fitting, in sorted order. A term's position is its feature index.
    pub vocabulary: Vec<String>,
    /// The inverse document frequency of each vocabulary term.
    pub idf: Vec<f64>,
    #[serde(skip)]
    index: BTreeMap<String, usize>,
}

impl TfIdfVectorizer {
    /// Learn the vocabulary and document frequencies of `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let document_terms: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|document| terms(document.as_ref()).into_iter().collect())
            .collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &document_terms {
            for term in terms {
                *document_frequency.entry(term.clone()).or_default() += 1;
            }
        }

        let document_count = documents.len() as f64;
        let (vocabulary, idf) = document_frequency
            .into_iter()
            .map(|(term, frequency)| {
                let idf = ((1.0 + document_count) / (1.0 + frequency as f64)).ln() + 1.0;
                (term, idf)
            })
            .unzip();

        Self::from_parts(vocabulary, idf)
    }

    /// Rebuild a vectorizer from its stored vocabulary and IDF weights.
    pub fn from_parts(vocabulary: Vec<String>, idf: Vec<f64>) -> Self {
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(position, term)| (term.clone(), position))
            .collect();

        Self {
            vocabulary,
            idf,
            index,
        }
    }

    /// Rebuild the term lookup after deserializing.
    pub(crate) fn reindex(self) -> Self {
        Self::from_parts(self.vocabulary, self.idf)
    }

    /// The number of features, i.e. the vocabulary size.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vectorize `text`.
    ///
    /// Terms outside the vocabulary are ignored, so text with no known terms
    /// gives the empty (all zero) vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(text) {
            if let Some(&position) = self.index.get(&term) {
                *counts.entry(position).or_default() += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(position, count)| (position, count * self.idf[position]))
            .collect();

        let norm = vector
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f64>()
            .sqrt();

        if norm > 0.0 {
            for (_, value) in vector.iter_mut() {
                *value /= norm;
            }
        }

        vector
    }
}
