// src/dashboard.rs

//! Polling client behind the analytics dashboard.
//!
//! The dashboard re-fetches the full result collection on a fixed interval and
//! re-aggregates it. Refreshes may overlap. Each one is stamped with a
//! generation number when issued, and a response is only displayed if no newer
//! request has been displayed already, so a slow stale response can never
//! overwrite fresher data.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::{
    config::DASHBOARD_POLL_SECS,
    handlers::analytics::ResultsPayload,
    models::QuizResult,
    services::{DashboardView, dashboard_view},
};

/// Refresh period of the dashboard page.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(DASHBOARD_POLL_SECS);

#[derive(Debug)]
pub enum TransportError {
    Request(reqwest::Error),
    Status(u16),
    Payload(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(err) => write!(f, "refresh request failed: {}", err),
            TransportError::Status(status) => {
                write!(f, "refresh endpoint answered with status {}", status)
            }
            TransportError::Payload(err) => write!(f, "invalid refresh payload: {}", err),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Request(err) => Some(err),
            TransportError::Status(_) => None,
            TransportError::Payload(err) => Some(err),
        }
    }
}

/// Where the dashboard gets its results from.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<QuizResult>, TransportError>;
}

/// Fetches results from the `POST /analytics` refresh endpoint.
#[derive(Debug, Clone)]
pub struct HttpResultSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpResultSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ResultSource for HttpResultSource {
    async fn fetch(&self) -> Result<Vec<QuizResult>, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(TransportError::Request)?;
        let payload: ResultsPayload =
            serde_json::from_slice(&body).map_err(TransportError::Payload)?;
        Ok(payload.results)
    }
}

/// Issued when a refresh starts; carries its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { generation: u64 },
    /// A newer request was already displayed; this response was dropped.
    Stale { generation: u64, displayed: u64 },
}

#[derive(Default)]
struct Displayed {
    generation: u64,
    view: Option<Arc<DashboardView>>,
}

pub struct Dashboard<S> {
    source: S,
    issued: AtomicU64,
    displayed: RwLock<Displayed>,
}

impl<S: ResultSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            issued: AtomicU64::new(0),
            displayed: RwLock::new(Displayed::default()),
        }
    }

    /// Starts from results rendered with the page, before the first fetch.
    pub fn with_initial(source: S, results: &[QuizResult]) -> Self {
        let dashboard = Self::new(source);
        dashboard.write_displayed(|displayed| {
            displayed.view = Some(Arc::new(dashboard_view(results)));
        });
        dashboard
    }

    /// The view currently on display, if any fetch has succeeded yet.
    pub fn current(&self) -> Option<Arc<DashboardView>> {
        self.read_displayed(|displayed| displayed.view.clone())
    }

    /// Generation of the view on display; 0 before the first applied refresh.
    pub fn displayed_generation(&self) -> u64 {
        self.read_displayed(|displayed| displayed.generation)
    }

    /// Number of refreshes started so far, including ones still in flight.
    pub fn issued_refreshes(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Aggregates fetched results and swaps them in, unless a newer refresh won.
    pub fn complete(&self, ticket: RefreshTicket, results: &[QuizResult]) -> RefreshOutcome {
        let view = Arc::new(dashboard_view(results));

        self.write_displayed(|displayed| {
            if ticket.generation <= displayed.generation {
                tracing::debug!(
                    "Discarding stale dashboard refresh {} (showing {})",
                    ticket.generation,
                    displayed.generation
                );
                return RefreshOutcome::Stale {
                    generation: ticket.generation,
                    displayed: displayed.generation,
                };
            }
            displayed.generation = ticket.generation;
            displayed.view = Some(view);
            RefreshOutcome::Applied {
                generation: ticket.generation,
            }
        })
    }

    /// Fetches and applies one refresh. On failure the displayed view is kept.
    pub async fn refresh(&self) -> Result<RefreshOutcome, TransportError> {
        let ticket = self.begin_refresh();
        match self.source.fetch().await {
            Ok(results) => Ok(self.complete(ticket, &results)),
            Err(err) => {
                tracing::warn!(
                    "Dashboard refresh {} failed, keeping current view: {}",
                    ticket.generation,
                    err
                );
                Err(err)
            }
        }
    }

    fn read_displayed<T>(&self, f: impl FnOnce(&Displayed) -> T) -> T {
        match self.displayed.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn write_displayed<T>(&self, f: impl FnOnce(&mut Displayed) -> T) -> T {
        match self.displayed.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl<S: ResultSource + 'static> Dashboard<S> {
    /// [`spawn_poller`](Self::spawn_poller) at the dashboard's 30 s cadence.
    pub fn spawn_default_poller(self: &Arc<Self>) -> JoinHandle<()> {
        self.spawn_poller(DEFAULT_POLL_INTERVAL)
    }

    /// Refreshes immediately, then once per `period`, until the handle is aborted.
    ///
    /// Ticks do not wait for earlier refreshes. Aborting the poller also
    /// aborts refreshes still in flight.
    pub fn spawn_poller(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let dashboard = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight = JoinSet::new();

            loop {
                ticker.tick().await;
                while in_flight.try_join_next().is_some() {}

                let dashboard = Arc::clone(&dashboard);
                in_flight.spawn(async move {
                    // Failures are logged by `refresh`.
                    let _ = dashboard.refresh().await;
                });
            }
        })
    }
}
