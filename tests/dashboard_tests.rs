// tests/dashboard_tests.rs

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;
use womb_quiz::{
    config::Config,
    dashboard::{Dashboard, HttpResultSource, RefreshOutcome, ResultSource, TransportError},
    models::{Category, QuizResult, ScoreSet},
    routes,
    state::AppState,
    store::MemoryResultStore,
};

fn result(id: i64, category: Category) -> QuizResult {
    QuizResult {
        id,
        name: format!("respondent-{}", id),
        email: format!("r{}@example.com", id),
        created_at: Utc.with_ymd_and_hms(2024, 11, 1, id as u32 % 24, 0, 0).unwrap(),
        category,
        scores: [(category, 6)].into_iter().collect::<ScoreSet>(),
        answers: BTreeMap::new(),
    }
}

/// Answers each fetch with the next scripted response, then fails.
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<QuizResult>, TransportError>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Vec<QuizResult>, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl ResultSource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<QuizResult>, TransportError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Status(503)))
    }
}

/// Each fetch waits for its own externally controlled response.
struct GatedSource {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<QuizResult>>>>,
}

#[async_trait]
impl ResultSource for GatedSource {
    async fn fetch(&self) -> Result<Vec<QuizResult>, TransportError> {
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx.await.map_err(|_| TransportError::Status(499)),
            None => Err(TransportError::Status(503)),
        }
    }
}

/// Counts fetches and always returns the same results.
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl ResultSource for CountingSource {
    async fn fetch(&self) -> Result<Vec<QuizResult>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![result(1, Category::Hot)])
    }
}

#[tokio::test]
async fn refresh_applies_aggregates() {
    let source = ScriptedSource::new(vec![Ok(vec![
        result(1, Category::Hot),
        result(2, Category::Hot),
        result(3, Category::Cold),
    ])]);
    let dashboard = Dashboard::new(source);
    assert!(dashboard.current().is_none());

    let outcome = dashboard.refresh().await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Applied { generation: 1 });

    let view = dashboard.current().unwrap();
    assert_eq!(view.summary.total, 3);
    assert_eq!(view.summary.counts_by_category[&Category::Hot], 2);
    assert_eq!(view.summary.counts_by_category[&Category::Cold], 1);
    assert_eq!(view.summary.counts_by_category[&Category::Damp], 0);
    assert_eq!(view.summary.counts_by_category[&Category::Stuck], 0);
}

#[tokio::test]
async fn failed_refresh_keeps_current_view() {
    let source = ScriptedSource::new(vec![
        Ok(vec![result(1, Category::Damp)]),
        Err(TransportError::Status(500)),
    ]);
    let dashboard = Dashboard::new(source);

    dashboard.refresh().await.unwrap();
    let before = dashboard.current().unwrap();

    let err = dashboard.refresh().await.unwrap_err();
    assert!(matches!(err, TransportError::Status(500)));

    let after = dashboard.current().unwrap();
    assert_eq!(*before, *after);
    assert_eq!(dashboard.displayed_generation(), 1);
}

#[tokio::test]
async fn initial_results_are_shown_before_first_fetch() {
    let source = ScriptedSource::new(vec![Ok(vec![])]);
    let dashboard = Dashboard::with_initial(source, &[result(1, Category::Stuck)]);

    assert_eq!(dashboard.current().unwrap().summary.total, 1);
    assert_eq!(dashboard.displayed_generation(), 0);

    // An empty refresh still replaces the view with zeroed aggregates.
    dashboard.refresh().await.unwrap();
    let view = dashboard.current().unwrap();
    assert_eq!(view.summary.total, 0);
    assert!(view.summary.counts_by_category.values().all(|c| *c == 0));
}

#[tokio::test]
async fn stale_response_is_discarded() {
    let dashboard = Dashboard::new(ScriptedSource::new(vec![]));

    let older = dashboard.begin_refresh();
    let newer = dashboard.begin_refresh();
    assert!(newer.generation() > older.generation());

    // The newer request answers first.
    let applied = dashboard.complete(newer, &[result(1, Category::Cold), result(2, Category::Cold)]);
    assert_eq!(
        applied,
        RefreshOutcome::Applied {
            generation: newer.generation()
        }
    );

    let stale = dashboard.complete(older, &[result(3, Category::Hot)]);
    assert_eq!(
        stale,
        RefreshOutcome::Stale {
            generation: older.generation(),
            displayed: newer.generation()
        }
    );

    let view = dashboard.current().unwrap();
    assert_eq!(view.summary.total, 2);
    assert_eq!(view.summary.counts_by_category[&Category::Cold], 2);
}

#[tokio::test]
async fn overlapping_refreshes_show_latest_request() {
    let (tx_first, rx_first) = oneshot::channel();
    let (tx_second, rx_second) = oneshot::channel();
    let dashboard = Arc::new(Dashboard::new(GatedSource {
        gates: Mutex::new(VecDeque::from([rx_first, rx_second])),
    }));

    let first = {
        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move { dashboard.refresh().await })
    };
    // Make sure the first refresh has taken its generation and gate.
    while dashboard.issued_refreshes() < 1 {
        tokio::task::yield_now().await;
    }
    let second = {
        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move { dashboard.refresh().await })
    };
    while dashboard.issued_refreshes() < 2 {
        tokio::task::yield_now().await;
    }

    // Second request completes before the first one.
    tx_second.send(vec![result(2, Category::Damp)]).unwrap();
    let second_outcome = second.await.unwrap().unwrap();
    assert_eq!(second_outcome, RefreshOutcome::Applied { generation: 2 });

    tx_first.send(vec![result(1, Category::Hot), result(3, Category::Hot)]).unwrap();
    let first_outcome = first.await.unwrap().unwrap();
    assert_eq!(
        first_outcome,
        RefreshOutcome::Stale {
            generation: 1,
            displayed: 2
        }
    );

    let view = dashboard.current().unwrap();
    assert_eq!(view.summary.total, 1);
    assert_eq!(view.summary.counts_by_category[&Category::Damp], 1);
}

#[tokio::test]
async fn poller_refreshes_on_mount_and_every_tick() {
    let dashboard = Arc::new(Dashboard::new(CountingSource {
        calls: AtomicUsize::new(0),
    }));

    let poller = dashboard.spawn_poller(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(150)).await;
    poller.abort();

    assert!(dashboard.displayed_generation() >= 2);
    assert_eq!(dashboard.current().unwrap().summary.total, 1);
}

#[tokio::test]
async fn http_source_reads_refresh_endpoint() {
    let store = Arc::new(MemoryResultStore::with_results(vec![
        result(1, Category::Hot),
        result(2, Category::Stuck),
    ]));
    let config = Config {
        database_url: None,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origins: vec![],
        log_dir: "logs".to_string(),
    };
    let app = routes::create_router(AppState { store, config });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dashboard = Dashboard::new(HttpResultSource::new(format!(
        "http://127.0.0.1:{}/analytics",
        port
    )));
    dashboard.refresh().await.unwrap();

    let view = dashboard.current().unwrap();
    assert_eq!(view.summary.total, 2);
    assert_eq!(view.summary.counts_by_category[&Category::Stuck], 1);
    assert_eq!(view.results[1].name, "respondent-2");

    // Wrong path: transport error, view unchanged.
    let broken = Dashboard::new(HttpResultSource::new(format!(
        "http://127.0.0.1:{}/missing",
        port
    )));
    assert!(matches!(
        broken.refresh().await,
        Err(TransportError::Status(404))
    ));
    assert!(broken.current().is_none());
}
