// src/models/quiz_result.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};

use super::category::{AnswerValue, Category};
use super::question::QuestionId;
use crate::error::ValidationError;

/// Per-category scores. Always holds all four categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSet {
    scores: [u32; 4],
}

impl ScoreSet {
    pub fn get(&self, category: Category) -> u32 {
        self.scores[category.index()]
    }

    pub fn add(&mut self, category: Category, points: u32) {
        self.scores[category.index()] += points;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Highest-scoring category; ties go to the earliest in `Category::ALL`.
    pub fn winner(&self) -> Category {
        let mut best = Category::ALL[0];
        for category in Category::ALL {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }
}

impl FromIterator<(Category, u32)> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = (Category, u32)>>(iter: I) -> Self {
        let mut set = ScoreSet::default();
        for (category, points) in iter {
            set.add(category, points);
        }
        set
    }
}

/// Loosely typed score mapping, as found in JSON payloads and JSONB columns.
impl TryFrom<BTreeMap<String, i64>> for ScoreSet {
    type Error = ValidationError;

    fn try_from(raw: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        let mut set = ScoreSet::default();
        for (name, score) in &raw {
            let category: Category = name.parse()?;
            let points = u32::try_from(*score).map_err(|_| ValidationError::ScoreOutOfRange {
                category: name.clone(),
                score: *score,
            })?;
            set.scores[category.index()] = points;
        }
        if let Some(missing) = Category::ALL
            .into_iter()
            .find(|c| !raw.contains_key(c.as_str()))
        {
            return Err(ValidationError::MissingScore(missing.to_string()));
        }
        Ok(set)
    }
}

impl Serialize for ScoreSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, score) in self.iter() {
            map.serialize_entry(category.as_str(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, i64>::deserialize(deserializer)?;
        ScoreSet::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// The answer record kept with a stored result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub category: Category,
    pub question: String,
    pub answer: AnswerValue,
}

/// A completed quiz, ready to be persisted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuizResult {
    pub name: String,
    pub email: String,
    pub category: Category,
    pub scores: ScoreSet,
    pub answers: BTreeMap<QuestionId, RecordedAnswer>,
}

/// A persisted quiz result. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub scores: ScoreSet,
    pub answers: BTreeMap<QuestionId, RecordedAnswer>,
}

impl QuizResult {
    pub fn from_new(id: i64, created_at: DateTime<Utc>, new: NewQuizResult) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            created_at,
            category: new.category,
            scores: new.scores,
            answers: new.answers,
        }
    }

    /// Score of the winning category.
    pub fn score(&self) -> u32 {
        self.scores.get(self.category)
    }
}
