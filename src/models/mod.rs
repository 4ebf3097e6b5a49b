// src/models/mod.rs

pub mod category;
pub mod question;
pub mod quiz_result;

pub use category::{AnswerValue, Category};
pub use question::{Answer, Question, QuestionId, Questionnaire, questionnaire};
pub use quiz_result::{NewQuizResult, QuizResult, RecordedAnswer, ScoreSet};
