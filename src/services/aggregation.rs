// src/services/aggregation.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Category, QuestionId, QuizResult};

/// Number of results per category. All four categories are always present.
pub type CategoryCounts = BTreeMap<Category, usize>;

/// Aggregate statistics over a result collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub counts_by_category: CategoryCounts,
    pub timeline: Vec<TimelinePoint>,
}

/// One result projected onto the timeline chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub score: u32,
    pub category: Category,
    pub name: String,
}

/// A bar of the category distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBar {
    pub name: Category,
    pub value: usize,
}

/// A row of the recent results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub email: String,
    pub category: Category,
    pub score: u32,
}

/// One answer in a respondent's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerDetail {
    pub question_id: QuestionId,
    pub category: Category,
    pub question: String,
    pub answer: u8,
    pub label: &'static str,
}

/// Everything the dashboard renders from one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub summary: Summary,
    pub distribution: Vec<DistributionBar>,
    pub results: Vec<ResultRow>,
}

/// Bar order used by the distribution chart.
const DISTRIBUTION_ORDER: [Category; 4] = [
    Category::Hot,
    Category::Cold,
    Category::Damp,
    Category::Stuck,
];

pub fn summarize(results: &[QuizResult]) -> Summary {
    let mut counts_by_category: CategoryCounts =
        Category::ALL.into_iter().map(|c| (c, 0)).collect();
    for result in results {
        *counts_by_category.entry(result.category).or_insert(0) += 1;
    }

    Summary {
        total: results.len(),
        counts_by_category,
        timeline: timeline(results),
    }
}

/// Results ordered by creation time (stable on equal timestamps).
pub fn timeline(results: &[QuizResult]) -> Vec<TimelinePoint> {
    let mut ordered: Vec<&QuizResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.created_at);

    ordered
        .into_iter()
        .map(|r| TimelinePoint {
            date: r.created_at.date_naive(),
            score: r.score(),
            category: r.category,
            name: r.name.clone(),
        })
        .collect()
}

pub fn distribution(counts: &CategoryCounts) -> Vec<DistributionBar> {
    DISTRIBUTION_ORDER
        .into_iter()
        .map(|name| DistributionBar {
            name,
            value: counts.get(&name).copied().unwrap_or(0),
        })
        .collect()
}

/// Table rows in the order the results were fetched.
pub fn results_table(results: &[QuizResult]) -> Vec<ResultRow> {
    results
        .iter()
        .map(|r| ResultRow {
            id: r.id,
            date: r.created_at.date_naive(),
            name: r.name.clone(),
            email: r.email.clone(),
            category: r.category,
            score: r.score(),
        })
        .collect()
}

/// A respondent's answers grouped by category name, alphabetically.
///
/// Answers within one category keep question id order.
pub fn drill_down(result: &QuizResult) -> Vec<AnswerDetail> {
    let mut details: Vec<AnswerDetail> = result
        .answers
        .iter()
        .map(|(id, recorded)| AnswerDetail {
            question_id: *id,
            category: recorded.category,
            question: recorded.question.clone(),
            answer: recorded.answer.into(),
            label: recorded.answer.label(),
        })
        .collect();
    details.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()));
    details
}

pub fn dashboard_view(results: &[QuizResult]) -> DashboardView {
    let summary = summarize(results);
    DashboardView {
        distribution: distribution(&summary.counts_by_category),
        results: results_table(results),
        summary,
    }
}
