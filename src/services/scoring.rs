// src/services/scoring.rs

use std::collections::{BTreeMap, HashSet};

use crate::{
    error::ValidationError,
    models::{
        Answer, AnswerValue, Category, NewQuizResult, Questionnaire, RecordedAnswer, ScoreSet,
        question::SubmittedAnswer,
    },
};

/// Outcome of scoring one answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoring {
    pub scores: ScoreSet,
    pub category: Category,
}

/// Sums answer points per category and picks the winner.
///
/// Each answer adds its raw value (YES = 2, Does not Apply = 1, NO = 0) to the
/// category of its question. On a tie the category listed first in
/// `Category::ALL` (HOT, DAMP, STUCK, COLD) wins.
pub fn score(answers: &[Answer]) -> Scoring {
    let scores: ScoreSet = answers
        .iter()
        .map(|a| (a.category, a.value.points()))
        .collect();

    Scoring {
        category: scores.winner(),
        scores,
    }
}

impl Questionnaire {
    /// Validates a raw submission against the question set.
    ///
    /// Every question must be answered exactly once. Returned answers follow
    /// questionnaire order, with each category copied from its question.
    pub fn collect_answers(
        &self,
        submitted: &[SubmittedAnswer],
    ) -> Result<Vec<Answer>, ValidationError> {
        let mut values = BTreeMap::new();
        let mut seen = HashSet::new();

        for entry in submitted {
            if self.get(entry.question_id).is_none() {
                return Err(ValidationError::UnknownQuestion(entry.question_id));
            }
            if !seen.insert(entry.question_id) {
                return Err(ValidationError::DuplicateAnswer(entry.question_id));
            }
            values.insert(entry.question_id, AnswerValue::try_from(entry.answer)?);
        }

        self.questions()
            .iter()
            .map(|question| {
                values
                    .get(&question.id)
                    .map(|value| Answer {
                        question_id: question.id,
                        category: question.category,
                        value: *value,
                    })
                    .ok_or(ValidationError::MissingAnswer(question.id))
            })
            .collect()
    }
}

/// Scores validated answers and assembles the record handed to the store.
///
/// Every answer must belong to `questionnaire`; its prompt is copied into the
/// record.
pub fn build_result(
    name: String,
    email: String,
    answers: &[Answer],
    questionnaire: &Questionnaire,
) -> Result<NewQuizResult, ValidationError> {
    let Scoring { scores, category } = score(answers);

    let recorded = answers
        .iter()
        .map(|answer| {
            let question = questionnaire
                .get(answer.question_id)
                .ok_or(ValidationError::UnknownQuestion(answer.question_id))?;
            Ok((
                answer.question_id,
                RecordedAnswer {
                    category: answer.category,
                    question: question.prompt.to_string(),
                    answer: answer.value,
                },
            ))
        })
        .collect::<Result<_, ValidationError>>()?;

    Ok(NewQuizResult {
        name,
        email,
        category,
        scores,
        answers: recorded,
    })
}
