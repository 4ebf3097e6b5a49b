// src/models/question.rs

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::category::{AnswerValue, Category};

pub type QuestionId = u32;

/// A single quiz prompt, tagged with the category it scores towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: Category,
    pub prompt: &'static str,
}

/// A respondent's answer, with the category copied from its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub question_id: QuestionId,
    pub category: Category,
    pub value: AnswerValue,
}

/// The ordered, immutable question set.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

const PROMPTS: [(Category, &str); 20] = [
    (Category::Hot, "Do you often feel hot or flushed, especially in the afternoon or at night?"),
    (Category::Hot, "Are your periods early, heavy, or bright red?"),
    (Category::Hot, "Do you experience night sweats or hot flashes?"),
    (Category::Hot, "Are you often thirsty or craving cold drinks?"),
    (Category::Hot, "Do you feel irritable or restless in the days before your period?"),
    (Category::Damp, "Do you notice heavy or sticky discharge during your cycle?"),
    (Category::Damp, "Do you often feel sluggish, heavy, or bloated?"),
    (Category::Damp, "Is your menstrual blood thick or mixed with mucus?"),
    (Category::Damp, "Do you retain water or feel puffy before your period?"),
    (Category::Damp, "Do you feel foggy or low on energy after meals?"),
    (Category::Stuck, "Do you get sharp or stabbing cramps during your period?"),
    (Category::Stuck, "Does your menstrual blood contain dark clots?"),
    (Category::Stuck, "Do your breasts feel tender or swollen before your period?"),
    (Category::Stuck, "Do tension and mood swings ease once bleeding starts?"),
    (Category::Stuck, "Is your cycle irregular, or does your flow stop and start?"),
    (Category::Cold, "Do you often have cold hands and feet?"),
    (Category::Cold, "Do your cramps ease with a hot water bottle?"),
    (Category::Cold, "Are your periods late, light, or pale?"),
    (Category::Cold, "Do you feel tired or chilled during your period?"),
    (Category::Cold, "Do you crave warm foods and drinks?"),
];

static QUESTIONNAIRE: LazyLock<Questionnaire> = LazyLock::new(|| {
    Questionnaire::new(
        PROMPTS
            .iter()
            .zip(1..)
            .map(|((category, prompt), id)| Question {
                id,
                category: *category,
                prompt: *prompt,
            })
            .collect(),
    )
});

/// Returns the process-wide question set, built on first use.
pub fn questionnaire() -> &'static Questionnaire {
    &QUESTIONNAIRE
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// One entry of a quiz submission, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    /// Raw answer value; anything outside 0..=2 is rejected.
    pub answer: i64,
}

/// DTO for submitting a completed quiz.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name length must be between 1 and 100 characters."
    ))]
    pub name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    pub answers: Vec<SubmittedAnswer>,
}
