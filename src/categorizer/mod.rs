//! Assigns spending categories to free-text transaction descriptions.
//!
//! Keyword rules decide first. When no rule matches, a TF-IDF and logistic
//! regression classifier trained offline by `train_classifier` picks the category.

mod classifier;
mod corpus;
mod endpoint;
mod features;
mod keywords;
mod label;
mod model;
mod service;

pub use corpus::{DEFAULT_CORPUS, TrainingSample, load_corpus_csv};
pub use endpoint::categorize_endpoint;
pub use keywords::KeywordRuleMatcher;
pub use label::CategoryLabel;
pub use model::TrainedClassifier;
pub use service::{Categorizer, ClassificationResult, ClassificationSource};
