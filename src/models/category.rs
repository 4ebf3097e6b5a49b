// src/models/category.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The four womb types a respondent can be classified into.
///
/// Declaration order is significant: it is the tie-break order used when
/// two categories share the top score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Hot,
    Damp,
    Stuck,
    Cold,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Hot,
        Category::Damp,
        Category::Stuck,
        Category::Cold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hot => "HOT",
            Category::Damp => "DAMP",
            Category::Stuck => "STUCK",
            Category::Cold => "COLD",
        }
    }

    /// Position in `Category::ALL`.
    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Hot => 0,
            Category::Damp => 1,
            Category::Stuck => 2,
            Category::Cold => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// A respondent's answer to one question.
/// Serialized as its raw integer: 0 = NO, 1 = Does not Apply, 2 = YES.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum AnswerValue {
    No,
    DoesNotApply,
    Yes,
}

impl AnswerValue {
    /// Points this answer contributes to its question's category.
    pub fn points(&self) -> u32 {
        match self {
            AnswerValue::No => 0,
            AnswerValue::DoesNotApply => 1,
            AnswerValue::Yes => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnswerValue::No => "NO",
            AnswerValue::DoesNotApply => "Does not Apply",
            AnswerValue::Yes => "YES",
        }
    }
}

impl TryFrom<i64> for AnswerValue {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AnswerValue::No),
            1 => Ok(AnswerValue::DoesNotApply),
            2 => Ok(AnswerValue::Yes),
            other => Err(ValidationError::AnswerOutOfRange(other)),
        }
    }
}

impl From<AnswerValue> for u8 {
    fn from(value: AnswerValue) -> Self {
        value.points() as u8
    }
}
