//! Multinomial logistic regression over sparse feature vectors.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    categorizer::{CategoryLabel, features::SparseVector},
};

/// Inverse regularization strength, smaller values regularize more.
pub const INVERSE_REGULARIZATION: f64 = 1.0;
/// Number of full-batch gradient descent steps taken by [LogisticRegression::fit].
pub const TRAINING_ITERATIONS: usize = 2000;

/// A softmax classifier with one weight row and intercept per label.
///
/// Training is deterministic: weights start at zero and every step uses the
/// whole training set, so the same data always gives the same model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// The labels the model can predict, sorted by name.
    pub labels: Vec<CategoryLabel>,
    /// One row of feature weights per label.
    pub weights: Vec<Vec<f64>>,
    /// One intercept per label.
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    /// Fit the model to `samples`, where every vector has `dimension` features.
    ///
    /// Minimizes `C * sum(cross entropy) + ||W||^2 / 2` with a fixed step of
    /// `1 / L`, where `L` bounds the curvature of the objective. Intercepts are
    /// not regularized.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCorpus] if there are no samples.
    pub fn fit(samples: &[(SparseVector, CategoryLabel)], dimension: usize) -> Result<Self, Error> {
        if samples.is_empty() {
            return Err(Error::InvalidCorpus("no training samples".to_owned()));
        }

        let mut labels: Vec<CategoryLabel> = samples.iter().map(|(_, label)| *label).collect();
        labels.sort_by_key(|label| label.as_str());
        labels.dedup();

        let targets: Vec<usize> = samples
            .iter()
            .map(|(_, label)| {
                labels
                    .iter()
                    .position(|candidate| candidate == label)
                    .unwrap_or_default()
            })
            .collect();

        let c = INVERSE_REGULARIZATION;
        let curvature_bound = c
            * 0.5
            * samples
                .iter()
                .map(|(vector, _)| 1.0 + squared_norm(vector))
                .sum::<f64>()
            + 1.0;
        let step_size = 1.0 / curvature_bound;

        let mut model = Self {
            weights: vec![vec![0.0; dimension]; labels.len()],
            intercepts: vec![0.0; labels.len()],
            labels,
        };

        for _ in 0..TRAINING_ITERATIONS {
            let mut weight_gradient: Vec<Vec<f64>> = model
                .weights
                .iter()
                .map(|row| row.iter().map(|weight| weight / c).collect())
                .collect();
            let mut intercept_gradient = vec![0.0; model.labels.len()];

            for ((vector, _), &target) in samples.iter().zip(&targets) {
                let probabilities = softmax(&model.scores(vector));

                for (class, probability) in probabilities.into_iter().enumerate() {
                    let error = probability - if class == target { 1.0 } else { 0.0 };

                    intercept_gradient[class] += error;
                    for &(feature, value) in vector {
                        weight_gradient[class][feature] += error * value;
                    }
                }
            }

            for (class, gradient_row) in weight_gradient.iter().enumerate() {
                for (weight, gradient) in model.weights[class].iter_mut().zip(gradient_row) {
                    *weight -= step_size * c * gradient;
                }
                model.intercepts[class] -= step_size * c * intercept_gradient[class];
            }
        }

        Ok(model)
    }

    /// The raw score of each label for `vector`, in the order of [Self::labels].
    pub fn scores(&self, vector: &SparseVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                intercept
                    + vector
                        .iter()
                        .map(|&(feature, value)| row.get(feature).copied().unwrap_or(0.0) * value)
                        .sum::<f64>()
            })
            .collect()
    }

    /// The label with the highest score, ties going to the earlier label.
    ///
    /// Returns `None` only for a model without labels.
    pub fn predict(&self, vector: &SparseVector) -> Option<CategoryLabel> {
        let scores = self.scores(vector);

        let mut best: Option<(usize, f64)> = None;
        for (position, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((position, score)),
            }
        }

        best.map(|(position, _)| self.labels[position])
    }

    /// Check that the weights and intercepts agree with the labels and `dimension`.
    pub fn is_consistent(&self, dimension: usize) -> bool {
        !self.labels.is_empty()
            && self.weights.len() == self.labels.len()
            && self.intercepts.len() == self.labels.len()
            && self.weights.iter().all(|row| row.len() == dimension)
    }
}

fn squared_norm(vector: &SparseVector) -> f64 {
    vector.iter().map(|(_, value)| value * value).sum()
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exponentials: Vec<f64> = scores.iter().map(|score| (score - max).exp()).collect();
    let total: f64 = exponentials.iter().sum();

    exponentials.into_iter().map(|value| value / total).collect()
}

#[cfg(test)]
mod logistic_regression_tests {
    use crate::{Error, categorizer::CategoryLabel};

    use super::{LogisticRegression, softmax};

    fn separable_samples() -> Vec<(Vec<(usize, f64)>, CategoryLabel)> {
        vec![
            (vec![(0, 1.0)], CategoryLabel::Transport),
            (vec![(0, 0.8), (2, 0.6)], CategoryLabel::Transport),
            (vec![(1, 1.0)], CategoryLabel::Food),
            (vec![(1, 0.6), (2, 0.8)], CategoryLabel::Food),
        ]
    }

    #[test]
    fn labels_are_sorted_by_name() {
        let model = LogisticRegression::fit(&separable_samples(), 3).unwrap();

        assert_eq!(
            model.labels,
            vec![CategoryLabel::Food, CategoryLabel::Transport]
        );
        assert!(model.is_consistent(3));
    }

    #[test]
    fn predicts_training_labels() {
        let model = LogisticRegression::fit(&separable_samples(), 3).unwrap();

        assert_eq!(
            model.predict(&vec![(0, 1.0)]),
            Some(CategoryLabel::Transport)
        );
        assert_eq!(model.predict(&vec![(1, 1.0)]), Some(CategoryLabel::Food));
    }

    #[test]
    fn tie_goes_to_earlier_label() {
        let model = LogisticRegression {
            labels: vec![CategoryLabel::Bills, CategoryLabel::Food],
            weights: vec![vec![0.0], vec![0.0]],
            intercepts: vec![0.5, 0.5],
        };

        assert_eq!(model.predict(&vec![]), Some(CategoryLabel::Bills));
    }

    #[test]
    fn fitting_is_deterministic() {
        let first = LogisticRegression::fit(&separable_samples(), 3).unwrap();
        let second = LogisticRegression::fit(&separable_samples(), 3).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn fitting_without_samples_fails() {
        let result = LogisticRegression::fit(&[], 3);

        assert!(matches!(result, Err(Error::InvalidCorpus(_))));
    }

    #[test]
    fn softmax_sums_to_one() {
        let probabilities = softmax(&[1000.0, 1000.0, -1000.0]);

        let total: f64 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((probabilities[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn detects_inconsistent_shapes() {
        let model = LogisticRegression {
            labels: vec![CategoryLabel::Bills],
            weights: vec![vec![0.0, 1.0]],
            intercepts: vec![0.0],
        };

        assert!(model.is_consistent(2));
        assert!(!model.is_consistent(3));
    }
}
