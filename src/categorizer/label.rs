//! The fixed set of spending categories the categorizer can assign.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A category label produced by the categorizer.
///
/// Serialized by its variant name, e.g. `"Food"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    /// Meals, groceries and food delivery.
    Food,
    /// Rides, fuel, tickets and parking.
    Transport,
    /// Retail purchases.
    Shopping,
    /// Utilities, recharges and loan payments.
    Bills,
    /// Medical costs, insurance and fitness.
    Healthcare,
    /// Fees, courses and study material.
    Education,
    /// Housing rent and maintenance.
    Rent,
    /// Streaming, movies, games and outings.
    Entertainment,
    /// Earnings from work.
    Salary,
    /// Other money received.
    Income,
}

impl CategoryLabel {
    /// Every label, in declaration order.
    pub const ALL: [CategoryLabel; 10] = [
        CategoryLabel::Food,
        CategoryLabel::Transport,
        CategoryLabel::Shopping,
        CategoryLabel::Bills,
        CategoryLabel::Healthcare,
        CategoryLabel::Education,
        CategoryLabel::Rent,
        CategoryLabel::Entertainment,
        CategoryLabel::Salary,
        CategoryLabel::Income,
    ];

    /// The label's name, which is also the name of the matching user category.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::Food => "Food",
            CategoryLabel::Transport => "Transport",
            CategoryLabel::Shopping => "Shopping",
            CategoryLabel::Bills => "Bills",
            CategoryLabel::Healthcare => "Healthcare",
            CategoryLabel::Education => "Education",
            CategoryLabel::Rent => "Rent",
            CategoryLabel::Entertainment => "Entertainment",
            CategoryLabel::Salary => "Salary",
            CategoryLabel::Income => "Income",
        }
    }
}

impl FromStr for CategoryLabel {
    type Err = Error;

    /// Parse a label name, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        CategoryLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::InvalidCorpus(format!("unknown category label \"{name}\"")))
    }
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
