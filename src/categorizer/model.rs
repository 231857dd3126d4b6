//! The trained classifier artifact: a TF-IDF vectorizer and the model fit on its features.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    categorizer::{
        CategoryLabel, TrainingSample,
        classifier::LogisticRegression,
        corpus::default_corpus,
        features::TfIdfVectorizer,
    },
};

/// A vectorizer and logistic regression model trained together on one corpus.
///
/// Stored as JSON, `{"vectorizer": {...}, "model": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedClassifier {
    vectorizer: TfIdfVectorizer,
    model: LogisticRegression,
}

impl TrainedClassifier {
    /// Fit a vectorizer and model to `samples`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCorpus] if `samples` is empty.
    pub fn train(samples: &[TrainingSample]) -> Result<Self, Error> {
        if samples.is_empty() {
            return Err(Error::InvalidCorpus("no training samples".to_owned()));
        }

        let descriptions: Vec<&str> = samples
            .iter()
            .map(|sample| sample.description.as_str())
            .collect();
        let vectorizer = TfIdfVectorizer::fit(&descriptions);

        let features: Vec<_> = samples
            .iter()
            .map(|sample| (vectorizer.transform(&sample.description), sample.label))
            .collect();
        let model = LogisticRegression::fit(&features, vectorizer.dimension())?;

        tracing::debug!(
            "Trained classifier on {} samples with {} terms and labels {:?}",
            samples.len(),
            vectorizer.dimension(),
            model.labels
        );

        Ok(Self { vectorizer, model })
    }

    /// Train on the built-in corpus.
    pub fn train_default() -> Result<Self, Error> {
        Self::train(&default_corpus())
    }

    /// The labels this classifier can predict.
    pub fn labels(&self) -> &[CategoryLabel] {
        &self.model.labels
    }

    /// Predict the label of `description`.
    ///
    /// Descriptions with no known terms fall back to the intercepts, so this
    /// always returns a label.
    pub fn predict(&self, description: &str) -> CategoryLabel {
        let vector = self.vectorizer.transform(description);

        // `load` and `train` guarantee at least one label.
        self.model
            .predict(&vector)
            .unwrap_or(self.model.labels[0])
    }

    /// Write the classifier as JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer(writer, self)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))
    }

    /// Write the classifier as JSON to the file at `path`, replacing it if it exists.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(|error| {
            Error::JSONSerializationError(format!("could not create {}: {error}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);

        self.to_writer(&mut writer)?;

        writer.flush().map_err(|error| {
            Error::JSONSerializationError(format!("could not write {}: {error}", path.display()))
        })
    }

    /// Read a classifier from JSON and check that its parts fit together.
    ///
    /// # Errors
    ///
    /// Returns [Error::ClassifierUnavailable] if the JSON cannot be parsed, the
    /// model has no labels, or the weights do not match the vocabulary.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let classifier: Self = serde_json::from_reader(reader)
            .map_err(|error| Error::ClassifierUnavailable(error.to_string()))?;

        let vectorizer = classifier.vectorizer.reindex();

        if vectorizer.idf.len() != vectorizer.dimension() {
            return Err(Error::ClassifierUnavailable(format!(
                "vocabulary has {} terms but {} IDF weights",
                vectorizer.dimension(),
                vectorizer.idf.len()
            )));
        }

        if !classifier.model.is_consistent(vectorizer.dimension()) {
            return Err(Error::ClassifierUnavailable(
                "model weights do not match the labels and vocabulary".to_owned(),
            ));
        }

        Ok(Self {
            vectorizer,
            model: classifier.model,
        })
    }

    /// Read a classifier from the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [Error::ClassifierUnavailable] if the file cannot be opened or
    /// does not hold a valid classifier.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|error| {
            Error::ClassifierUnavailable(format!("could not open {}: {error}", path.display()))
        })?;

        Self::from_reader(BufReader::new(file))
    }
}
