//! Staggered fetch-and-refresh controller for the tracked metals.
//!
//! A [`MetalBoard`] owns one [`FetchState`] per tracked metal. Every fetch
//! cycle resets all of them to [`FetchState::Loading`] and issues one request
//! per metal, spaced by the stagger interval so the provider's rate limit is
//! not hit. Each request is tagged with the generation of the cycle that
//! issued it; results arriving after a newer cycle has started are dropped.

use crate::core::metal::{self, TrackedMetal};
use crate::core::price::{FetchError, PriceFetchClient, SpotQuote};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_STAGGER_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// A successfully fetched price and the moment it arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub previous_close: Option<f64>,
    pub previous_open: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Ready(PricePoint),
    Failed(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

impl FetchState {
    pub fn phase(&self) -> Phase {
        match self {
            FetchState::Loading => Phase::Loading,
            FetchState::Ready(_) => Phase::Ready,
            FetchState::Failed(_) => Phase::Failed,
        }
    }

    pub fn price(&self) -> Option<f64> {
        self.point().map(|p| p.price)
    }

    pub fn previous_close(&self) -> Option<f64> {
        self.point().and_then(|p| p.previous_close)
    }

    pub fn previous_open(&self) -> Option<f64> {
        self.point().and_then(|p| p.previous_open)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.point().map(|p| p.fetched_at)
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            FetchState::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    fn point(&self) -> Option<&PricePoint> {
        match self {
            FetchState::Ready(point) => Some(point),
            _ => None,
        }
    }
}

/// Read-only view of the board, index-aligned with the tracked metals.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub currency: String,
    pub generation: u64,
    pub entries: Vec<(TrackedMetal, FetchState)>,
}

impl BoardSnapshot {
    pub fn iter(&self) -> impl Iterator<Item = &(TrackedMetal, FetchState)> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&(TrackedMetal, FetchState)> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once no metal is still loading.
    pub fn is_settled(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, state)| state.phase() != Phase::Loading)
    }
}

/// Details of a metal that has a price, as shown when it is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct MetalDetail {
    pub metal: TrackedMetal,
    pub currency: String,
    pub price: f64,
    pub previous_close: Option<f64>,
    pub previous_open: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

impl MetalDetail {
    pub fn price_per_gram(&self) -> f64 {
        metal::price_per_gram(self.price)
    }

    pub fn price_per_ten_grams(&self) -> f64 {
        metal::price_per_ten_grams(self.price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    /// Delay between consecutive fetch issuances within a cycle.
    pub stagger_interval: Duration,
    /// Upper bound for a single fetch; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            stagger_interval: DEFAULT_STAGGER_INTERVAL,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

struct BoardState {
    currency: String,
    generation: u64,
    slots: Vec<FetchState>,
}

struct Shared {
    metals: Vec<TrackedMetal>,
    client: Arc<dyn PriceFetchClient>,
    options: BoardOptions,
    state: RwLock<BoardState>,
    revision: watch::Sender<u64>,
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    async fn fetch(&self, symbol: &str, currency: &str) -> Result<SpotQuote, FetchError> {
        let request = self.client.fetch(symbol, currency);
        match self.options.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(FetchError::Timeout)),
            None => request.await,
        }
    }

    /// Stores the outcome of one fetch in its slot, unless a newer cycle has
    /// started since it was issued.
    fn complete(
        &self,
        index: usize,
        generation: u64,
        metal: TrackedMetal,
        outcome: Result<SpotQuote, FetchError>,
    ) {
        let next = match outcome {
            Ok(quote) => FetchState::Ready(PricePoint {
                price: quote.price,
                previous_close: quote.previous_close,
                previous_open: quote.previous_open,
                fetched_at: Utc::now(),
            }),
            Err(e) => FetchState::Failed(e),
        };

        {
            let mut state = self.write();
            if state.generation != generation {
                debug!(
                    metal = metal.name,
                    issued = generation,
                    current = state.generation,
                    "Dropping result from superseded cycle"
                );
                return;
            }
            let Some(slot) = state.slots.get_mut(index) else {
                return;
            };
            *slot = next.clone();
        }

        match &next {
            FetchState::Failed(e) => warn!(metal = metal.name, error = %e, "Price fetch failed"),
            _ => debug!(metal = metal.name, price = ?next.price(), "Price fetched"),
        }
        self.publish();
    }
}

/// Holds the tasks of one fetch cycle.
pub struct CycleHandle {
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
}

impl CycleHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits until every fetch of this cycle has finished.
    pub async fn settled(self) {
        self.settled_with(&|| ()).await
    }

    /// Waits for every fetch of this cycle, calling `on_settled` as each one
    /// finishes, in completion order.
    pub async fn settled_with(self, on_settled: &(dyn Fn() + Sync)) {
        join_all(self.tasks.into_iter().map(|task| async move {
            if let Err(e) = task.await {
                warn!(error = %e, "Fetch task did not run to completion");
            }
            on_settled();
        }))
        .await;
    }
}

/// Tracks the price of each metal in the selected currency.
///
/// Cloning is cheap and every clone drives the same board.
#[derive(Clone)]
pub struct MetalBoard {
    shared: Arc<Shared>,
}

impl MetalBoard {
    /// Creates a board with every metal in the loading state. No request is
    /// issued until [`MetalBoard::start_cycle`] is called.
    pub fn new(
        client: Arc<dyn PriceFetchClient>,
        metals: Vec<TrackedMetal>,
        currency: impl Into<String>,
        options: BoardOptions,
    ) -> Self {
        let slots = vec![FetchState::Loading; metals.len()];
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                metals,
                client,
                options,
                state: RwLock::new(BoardState {
                    currency: currency.into(),
                    generation: 0,
                    slots,
                }),
                revision,
            }),
        }
    }

    pub fn metals(&self) -> &[TrackedMetal] {
        &self.shared.metals
    }

    pub fn currency(&self) -> String {
        self.shared.read().currency.clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.read().generation
    }

    /// Resets every metal to loading and schedules one fetch per metal in
    /// list order, the n-th one `n * stagger_interval` from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_cycle(&self) -> CycleHandle {
        self.begin_cycle(None)
    }

    /// Switches the board to `code` and starts a new cycle with it.
    pub fn set_currency(&self, code: impl Into<String>) -> CycleHandle {
        self.begin_cycle(Some(code.into()))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.shared.read();
        BoardSnapshot {
            currency: state.currency.clone(),
            generation: state.generation,
            entries: self
                .shared
                .metals
                .iter()
                .copied()
                .zip(state.slots.iter().cloned())
                .collect(),
        }
    }

    /// Returns the details of the metal at `index` if it has a price.
    pub fn select_entity(&self, index: usize) -> Option<MetalDetail> {
        let metal = *self.shared.metals.get(index)?;
        let state = self.shared.read();
        match state.slots.get(index)? {
            FetchState::Ready(point) => Some(MetalDetail {
                metal,
                currency: state.currency.clone(),
                price: point.price,
                previous_close: point.previous_close,
                previous_open: point.previous_open,
                fetched_at: point.fetched_at,
            }),
            _ => None,
        }
    }

    /// Receiver that is notified whenever a slot changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    fn begin_cycle(&self, currency: Option<String>) -> CycleHandle {
        let started = Instant::now();
        let (generation, currency) = {
            let mut state = self.shared.write();
            if let Some(code) = currency {
                state.currency = code;
            }
            state.generation += 1;
            state.slots.fill(FetchState::Loading);
            (state.generation, state.currency.clone())
        };
        self.shared.publish();

        info!(
            generation,
            currency = %currency,
            metals = self.shared.metals.len(),
            "Starting fetch cycle"
        );

        let stagger = self.shared.options.stagger_interval;
        let tasks = self
            .shared
            .metals
            .iter()
            .copied()
            .enumerate()
            .map(|(index, metal)| {
                let shared = Arc::clone(&self.shared);
                let currency = currency.clone();
                let issue_at = started + stagger * index as u32;
                tokio::spawn(async move {
                    tokio::time::sleep_until(issue_at).await;
                    let current = shared.read().generation;
                    if current != generation {
                        debug!(
                            metal = metal.name,
                            generation,
                            current,
                            "Skipping fetch from superseded cycle"
                        );
                        return;
                    }
                    debug!(
                        metal = metal.name,
                        symbol = metal.symbol,
                        currency = %currency,
                        generation,
                        "Issuing price fetch"
                    );
                    let outcome = shared.fetch(metal.symbol, &currency).await;
                    shared.complete(index, generation, metal, outcome);
                })
            })
            .collect();

        CycleHandle { generation, tasks }
    }
}
