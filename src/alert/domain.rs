//! Budget alert types and the pure threshold rules.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{
    budget::spend_percentage,
    category::{CategoryId, CategoryType},
    database_id::{DatabaseId, UserId},
};

/// Spending at or above this percentage of the limit raises a warning.
pub const WARNING_PERCENTAGE: f64 = 80.0;
/// Spending at or above this percentage of the limit raises a danger alert.
pub const DANGER_PERCENTAGE: f64 = 100.0;

/// How severe a budget alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Most of the budget has been used.
    Warning,
    /// The budget has been exceeded.
    Danger,
}

impl AlertLevel {
    /// The lowercase name used in the database and the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }

    /// The message shown to the user for an alert of this level.
    pub fn message(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "You have used over 80% of your budget.",
            AlertLevel::Danger => "Budget exceeded! Please reduce spending.",
        }
    }
}

impl FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(AlertLevel::Warning),
            "danger" => Ok(AlertLevel::Danger),
            other => Err(format!("invalid alert level \"{other}\"")),
        }
    }
}

impl Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for AlertLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AlertLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A stored budget alert for one user, category and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// The ID of the alert.
    pub id: DatabaseId,
    /// The user the alert belongs to.
    pub user_id: UserId,
    /// The budgeted category that crossed a threshold.
    pub category_id: CategoryId,
    /// The calendar year of the month the alert is for.
    pub year: i32,
    /// The month number in `1..=12`.
    pub month: u8,
    /// How far over the threshold spending is.
    pub level: AlertLevel,
    /// The message shown to the user, see [AlertLevel::message].
    pub message: String,
}

/// The result of reconciling the alert for a category and month.
///
/// Serialized as `{"status": "...", "level"?: "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// The category has no budget, or its limit is zero.
    NoBudget,
    /// Income categories are never budgeted against.
    IncomeCategory,
    /// Spending is below the warning threshold.
    WithinLimit,
    /// Spending crossed a threshold and an alert is stored.
    AlertTriggered {
        /// The level of the stored alert.
        level: AlertLevel,
    },
}

/// Decide the alert outcome for a category from its type, its monthly limit
/// (if it has a budget) and the amount spent in the month.
pub fn evaluate(
    category_type: CategoryType,
    monthly_limit: Option<f64>,
    spend: f64,
) -> AlertOutcome {
    if category_type == CategoryType::Income {
        return AlertOutcome::IncomeCategory;
    }

    let Some(monthly_limit) = monthly_limit.filter(|&limit| limit > 0.0) else {
        return AlertOutcome::NoBudget;
    };

    let percentage = spend_percentage(spend, monthly_limit);

    if percentage >= DANGER_PERCENTAGE {
        AlertOutcome::AlertTriggered {
            level: AlertLevel::Danger,
        }
    } else if percentage >= WARNING_PERCENTAGE {
        AlertOutcome::AlertTriggered {
            level: AlertLevel::Warning,
        }
    } else {
        AlertOutcome::WithinLimit
    }
}

#[cfg(test)]
mod evaluate_tests {
    use serde_json::json;

    use crate::category::CategoryType;

    use super::{AlertLevel, AlertOutcome, evaluate};

    const WARNING: AlertOutcome = AlertOutcome::AlertTriggered {
        level: AlertLevel::Warning,
    };
    const DANGER: AlertOutcome = AlertOutcome::AlertTriggered {
        level: AlertLevel::Danger,
    };

    #[test]
    fn thresholds() {
        let cases = [
            (0.0, AlertOutcome::WithinLimit),
            (799.0, AlertOutcome::WithinLimit),
            (800.0, WARNING),
            (999.0, WARNING),
            (1000.0, DANGER),
            (5000.0, DANGER),
        ];

        for (spend, want) in cases {
            assert_eq!(
                evaluate(CategoryType::Expense, Some(1000.0), spend),
                want,
                "spend {spend}"
            );
        }
    }

    #[test]
    fn percentage_is_rounded_before_comparison() {
        // 79.996% rounds to 80.0%.
        assert_eq!(evaluate(CategoryType::Expense, Some(100000.0), 79996.0), WARNING);
    }

    #[test]
    fn income_is_checked_before_budget() {
        assert_eq!(
            evaluate(CategoryType::Income, Some(10.0), 1000.0),
            AlertOutcome::IncomeCategory
        );
        assert_eq!(
            evaluate(CategoryType::Income, None, 0.0),
            AlertOutcome::IncomeCategory
        );
    }

    #[test]
    fn missing_or_zero_limit_is_no_budget() {
        assert_eq!(
            evaluate(CategoryType::Expense, None, 50.0),
            AlertOutcome::NoBudget
        );
        assert_eq!(
            evaluate(CategoryType::Expense, Some(0.0), 50.0),
            AlertOutcome::NoBudget
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        assert_eq!(
            serde_json::to_value(AlertOutcome::WithinLimit).unwrap(),
            json!({"status": "within_limit"})
        );
        assert_eq!(
            serde_json::to_value(DANGER).unwrap(),
            json!({"status": "alert_triggered", "level": "danger"})
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            AlertLevel::Warning.message(),
            "You have used over 80% of your budget."
        );
        assert_eq!(
            AlertLevel::Danger.message(),
            "Budget exceeded! Please reduce spending."
        );
    }
}
