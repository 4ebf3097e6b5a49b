// src/store/memory.rs

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ResultStore, StorageError};
use crate::models::{NewQuizResult, QuizResult};

/// In-process result store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryResultStore {
    results: Mutex<Vec<QuizResult>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from previously persisted results, e.g. fixtures.
    pub fn with_results(results: Vec<QuizResult>) -> Self {
        Self {
            results: Mutex::new(results),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<QuizResult>>, StorageError> {
        self.results
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn insert(&self, result: NewQuizResult) -> Result<QuizResult, StorageError> {
        let mut results = self.lock()?;
        let id = results.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let stored = QuizResult::from_new(id, Utc::now(), result);
        results.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<QuizResult>, StorageError> {
        let mut results = self.lock()?.clone();
        results.sort_by_key(|r| r.id);
        Ok(results)
    }

    async fn fetch(&self, id: i64) -> Result<Option<QuizResult>, StorageError> {
        Ok(self.lock()?.iter().find(|r| r.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ScoreSet};
    use std::collections::BTreeMap;

    fn new_result(name: &str, category: Category) -> NewQuizResult {
        NewQuizResult {
            name: name.to_string(),
            email: format!("{}@example.com", name),
            category,
            scores: [(category, 2)].into_iter().collect::<ScoreSet>(),
            answers: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_timestamps() {
        let store = MemoryResultStore::new();
        let before = Utc::now();

        let first = store.insert(new_result("ana", Category::Hot)).await.unwrap();
        let second = store.insert(new_result("bea", Category::Cold)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.created_at >= before);
        assert_eq!(second.category, Category::Cold);
    }

    #[tokio::test]
    async fn test_list_and_fetch() {
        let store = MemoryResultStore::new();
        assert!(store.list_all().await.unwrap().is_empty());

        store.insert(new_result("ana", Category::Hot)).await.unwrap();
        store.insert(new_result("bea", Category::Damp)).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "ana");

        let fetched = store.fetch(2).await.unwrap().unwrap();
        assert_eq!(fetched.name, "bea");
        assert!(store.fetch(3).await.unwrap().is_none());
    }
}
