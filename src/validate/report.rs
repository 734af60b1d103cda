//! Validation report and grading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::check::{Category, CheckId, CheckStatus};

/// Letter grade for a migration.
///
/// Ordered best first, so `Grade::A < Grade::B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade for a 0-100 score.
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Grade::A
        } else if score >= 80 {
            Grade::B
        } else if score >= 70 {
            Grade::C
        } else if score >= 60 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Whether this grade is at least as good as `min`.
    pub fn meets(&self, min: Grade) -> bool {
        *self <= min
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            other => Err(format!("Unknown grade '{}' (expected A, B, C, D or F)", other)),
        }
    }
}

/// One check's contribution to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub id: CheckId,
    pub name: String,
    pub category: Category,
    pub weight: u32,
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

/// Per-category tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    pub total: usize,
    /// Passed checks as a percentage of the category.
    pub pass_rate: u32,
}

/// Result of running every registered check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub outcomes: Vec<CheckOutcome>,
    /// Weighted score from 0 to 100. Warnings earn half credit.
    pub score: u32,
    pub grade: Grade,
    pub categories: Vec<CategoryScore>,
}

impl ValidationReport {
    /// Build a report from check outcomes in run order.
    pub fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let total_weight: u32 = outcomes.iter().map(|o| o.weight).sum();
        let earned: f64 = outcomes
            .iter()
            .map(|o| o.weight as f64 * o.status.credit())
            .sum();
        let score = if total_weight == 0 {
            0
        } else {
            (earned / total_weight as f64 * 100.0).round() as u32
        };

        let mut by_category: BTreeMap<Category, CategoryScore> = BTreeMap::new();
        for outcome in &outcomes {
            let entry = by_category
                .entry(outcome.category)
                .or_insert_with(|| CategoryScore {
                    category: outcome.category,
                    passed: 0,
                    warnings: 0,
                    failed: 0,
                    total: 0,
                    pass_rate: 0,
                });
            entry.total += 1;
            match outcome.status {
                CheckStatus::Pass => entry.passed += 1,
                CheckStatus::Warning => entry.warnings += 1,
                CheckStatus::Fail => entry.failed += 1,
            }
        }
        let categories = by_category
            .into_values()
            .map(|mut c| {
                c.pass_rate = (c.passed as f64 / c.total as f64 * 100.0).round() as u32;
                c
            })
            .collect();

        Self {
            outcomes,
            score,
            grade: Grade::from_score(score),
            categories,
        }
    }

    /// Whether the grade is at least `min`.
    pub fn meets(&self, min: Grade) -> bool {
        self.grade.meets(min)
    }

    /// Checks that failed outright.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::Fail)
    }

    /// Checks that passed with a warning.
    pub fn warnings(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::Warning)
    }

    /// Number of checks with the given status.
    pub fn count(&self, status: CheckStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
