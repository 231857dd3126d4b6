//! Labeled descriptions used to train the statistical classifier.

use std::io::Read;

use serde::Deserialize;

use crate::{Error, categorizer::CategoryLabel};

/// A description paired with the category it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// Free-text transaction description.
    pub description: String,
    /// The category the description belongs to.
    pub label: CategoryLabel,
}

/// The built-in training corpus.
pub const DEFAULT_CORPUS: [(&str, CategoryLabel); 16] = [
    ("salary credited", CategoryLabel::Income),
    ("monthly salary", CategoryLabel::Income),
    ("office salary", CategoryLabel::Income),
    ("grocery shopping", CategoryLabel::Food),
    ("bought vegetables", CategoryLabel::Food),
    ("food from restaurant", CategoryLabel::Food),
    ("lunch at cafe", CategoryLabel::Food),
    ("uber ride", CategoryLabel::Transport),
    ("ola cab", CategoryLabel::Transport),
    ("bus ticket", CategoryLabel::Transport),
    ("metro recharge", CategoryLabel::Transport),
    ("electricity bill", CategoryLabel::Bills),
    ("water bill", CategoryLabel::Bills),
    ("mobile recharge", CategoryLabel::Bills),
    ("netflix subscription", CategoryLabel::Entertainment),
    ("spotify premium", CategoryLabel::Entertainment),
];

/// The built-in training corpus as owned samples.
pub fn default_corpus() -> Vec<TrainingSample> {
    DEFAULT_CORPUS
        .iter()
        .map(|(description, label)| TrainingSample {
            description: (*description).to_owned(),
            label: *label,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct CorpusRecord {
    description: String,
    category: String,
}

/// Read a training corpus from CSV with the header `description,category`.
///
/// # Errors
///
/// Returns [Error::InvalidCorpus] if a row cannot be parsed, a category is not
/// a known label, or the file has no rows.
pub fn load_corpus_csv<R: Read>(reader: R) -> Result<Vec<TrainingSample>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut samples = Vec::new();
    for (row, record) in csv_reader.deserialize::<CorpusRecord>().enumerate() {
        let record = record
            .map_err(|error| Error::InvalidCorpus(format!("row {}: {error}", row + 1)))?;
        let label = record.category.parse()?;

        samples.push(TrainingSample {
            description: record.description,
            label,
        });
    }

    if samples.is_empty() {
        return Err(Error::InvalidCorpus("the corpus has no rows".to_owned()));
    }

    Ok(samples)
}

#[cfg(test)]
mod corpus_tests {
    use crate::{Error, categorizer::CategoryLabel};

    use super::{default_corpus, load_corpus_csv};

    #[test]
    fn loads_csv_rows() {
        let csv = "description,category\nuber ride,Transport\n\"rent, october\",rent\n";

        let samples = load_corpus_csv(csv.as_bytes()).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, CategoryLabel::Transport);
        assert_eq!(samples[1].description, "rent, october");
        assert_eq!(samples[1].label, CategoryLabel::Rent);
    }

    #[test]
    fn rejects_unknown_label() {
        let csv = "description,category\nuber ride,Travel\n";

        let result = load_corpus_csv(csv.as_bytes());

        assert!(matches!(result, Err(Error::InvalidCorpus(_))));
    }

    #[test]
    fn rejects_empty_corpus() {
        let result = load_corpus_csv("description,category\n".as_bytes());

        assert!(matches!(result, Err(Error::InvalidCorpus(_))));
    }

    #[test]
    fn rejects_missing_column() {
        let result = load_corpus_csv("description\nuber ride\n".as_bytes());

        assert!(matches!(result, Err(Error::InvalidCorpus(_))));
    }

    #[test]
    fn default_corpus_has_five_labels() {
        let mut labels: Vec<_> = default_corpus().into_iter().map(|s| s.label).collect();
        labels.sort();
        labels.dedup();

        assert_eq!(
            labels,
            vec![
                CategoryLabel::Food,
                CategoryLabel::Transport,
                CategoryLabel::Bills,
                CategoryLabel::Entertainment,
                CategoryLabel::Income,
            ]
        );
    }
}
