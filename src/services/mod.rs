// src/services/mod.rs

pub mod aggregation;
pub mod scoring;

pub use aggregation::{DashboardView, Summary, dashboard_view, drill_down, summarize};
pub use scoring::{Scoring, build_result, score};
