//! The reconciliation lifecycle: snapshot, stream, tick application, teardown.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use stockgrid_core::stream::StreamSession;
use stockgrid_core::{GridConfig, GridConnector, GridError, QuoteTable, QuoteUpdate};

use crate::snapshot;
use crate::watchlist::{Watchlist, default_portfolio};

/// Cloned presentation snapshot of the engine's current phase.
#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    /// No activation in progress.
    Idle,
    /// Snapshot fetch in flight; no table exists yet.
    Loading,
    /// The snapshot failed as a whole; `activate()` again to retry.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
    /// The table is populated and accepts live ticks until teardown.
    Ready {
        /// Cloned reconciled table.
        table: QuoteTable,
    },
}

enum Phase {
    Idle,
    Loading,
    Ready(QuoteTable),
    Failed(String),
}

struct Activation {
    session: StreamSession,
    apply: JoinHandle<()>,
}

struct GridState {
    phase: Phase,
    // Bumped on every activate/deactivate; stale async completions compare
    // against it under the lock and no-op.
    generation: u64,
    activation: Option<Activation>,
}

/// Builder for constructing a [`StockGrid`] engine.
pub struct StockGridBuilder {
    connector: Option<Arc<dyn GridConnector>>,
    watchlist: Watchlist,
    cfg: GridConfig,
}

impl Default for StockGridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StockGridBuilder {
    /// Create a new builder tracking the bundled demo portfolio with default
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            watchlist: default_portfolio(),
            cfg: GridConfig::default(),
        }
    }

    /// Set the connector the engine snapshots and streams through.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn GridConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace the tracked symbol set.
    #[must_use]
    pub fn watchlist(mut self, watchlist: Watchlist) -> Self {
        self.watchlist = watchlist;
        self
    }

    /// Override the engine configuration.
    #[must_use]
    pub fn config(mut self, cfg: GridConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector has been registered via
    /// [`with_connector`](Self::with_connector).
    pub fn build(self) -> Result<StockGrid, GridError> {
        let Some(connector) = self.connector else {
            return Err(GridError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            ));
        };
        let (revision, _) = watch::channel(0u64);
        Ok(StockGrid {
            connector,
            watchlist: self.watchlist,
            cfg: self.cfg,
            state: Arc::new(Mutex::new(GridState {
                phase: Phase::Idle,
                generation: 0,
                activation: None,
            })),
            revision,
        })
    }
}

/// Engine that reconciles a batch quote snapshot with a live tick stream for
/// a fixed tracked symbol set.
///
/// Phases move `Idle → Loading → Ready` (or `Failed`); `Ready` keeps
/// accepting ticks until [`deactivate`](Self::deactivate). At most one live
/// stream session exists per activation, and no update lands after teardown
/// even if one is already in flight.
pub struct StockGrid {
    connector: Arc<dyn GridConnector>,
    watchlist: Watchlist,
    cfg: GridConfig,
    state: Arc<Mutex<GridState>>,
    revision: watch::Sender<u64>,
}

impl std::fmt::Debug for StockGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockGrid")
            .field("connector", &self.connector.name())
            .field("watchlist", &self.watchlist)
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl StockGrid {
    /// Start building a new engine.
    #[must_use]
    pub fn builder() -> StockGridBuilder {
        StockGridBuilder::new()
    }

    /// The tracked symbol set this engine reconciles.
    #[must_use]
    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    /// Bring the grid live: snapshot the tracked set, then open the stream.
    ///
    /// Implicitly deactivates any previous activation first, so repeated
    /// calls are safe and never leak a session. The snapshot populates the
    /// table before the stream opens; a stream-open failure leaves the grid
    /// `Ready` with a frozen table and is only logged.
    pub async fn activate(&self) {
        let (generation, prev) = self.begin(Phase::Loading).await;
        self.notify();
        teardown(prev).await;

        let symbols = self.watchlist.symbols();
        let result = match self.connector.as_quote_provider() {
            Some(provider) => {
                snapshot::fetch_table(provider, self.connector.name(), &symbols, &self.cfg).await
            }
            None => Err(GridError::unsupported("quote")),
        };

        let table = match result {
            Ok(table) => table,
            Err(e) => {
                let mut st = self.state.lock().await;
                if st.generation != generation {
                    return;
                }
                st.phase = Phase::Failed(e.to_string());
                drop(st);
                self.notify();
                return;
            }
        };

        {
            let mut st = self.state.lock().await;
            if st.generation != generation {
                return;
            }
            st.phase = Phase::Ready(table);
        }
        self.notify();

        let Some(streamer) = self.connector.as_stream_provider() else {
            tracing::warn!(connector = self.connector.name(), "no stream capability; table frozen");
            return;
        };
        let (session, rx) = match streamer
            .stream_quotes(&symbols, self.cfg.channel_capacity)
            .await
        {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(connector = self.connector.name(), error = %e, "stream open failed; table frozen");
                return;
            }
        };

        let apply = tokio::spawn(apply_loop(
            Arc::clone(&self.state),
            self.revision.clone(),
            generation,
            rx,
        ));

        let mut st = self.state.lock().await;
        if st.generation != generation {
            // A concurrent deactivate/re-activate won the race; tear down
            // what we just opened instead of installing it.
            drop(st);
            teardown(Some(Activation { session, apply })).await;
            return;
        }
        st.activation = Some(Activation { session, apply });
    }

    /// Tear the grid down from any phase and return to `Idle`.
    ///
    /// Closes the live stream session if any; idempotent.
    pub async fn deactivate(&self) {
        let (_, prev) = self.begin(Phase::Idle).await;
        teardown(prev).await;
        self.notify();
    }

    /// Cloned snapshot of the current phase for presentation.
    pub async fn view(&self) -> GridView {
        let st = self.state.lock().await;
        match &st.phase {
            Phase::Idle => GridView::Idle,
            Phase::Loading => GridView::Loading,
            Phase::Failed(message) => GridView::Failed {
                message: message.clone(),
            },
            Phase::Ready(table) => GridView::Ready {
                table: table.clone(),
            },
        }
    }

    /// Revision counter bumped on every observable state change; await it to
    /// refresh a presentation of [`view`](Self::view).
    #[must_use]
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Bump the generation, install the new phase, and hand back the previous
    /// activation for teardown outside the lock.
    async fn begin(&self, phase: Phase) -> (u64, Option<Activation>) {
        let mut st = self.state.lock().await;
        st.generation += 1;
        st.phase = phase;
        let prev = st.activation.take();
        (st.generation, prev)
    }

    fn notify(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

async fn teardown(activation: Option<Activation>) {
    if let Some(mut act) = activation {
        act.session.close().await;
        act.apply.abort();
    }
}

/// Drain the tick receiver into the table for as long as the generation the
/// stream was opened under is still current.
async fn apply_loop(
    state: Arc<Mutex<GridState>>,
    revision: watch::Sender<u64>,
    generation: u64,
    mut rx: mpsc::Receiver<QuoteUpdate>,
) {
    while let Some(update) = rx.recv().await {
        let applied = {
            let mut st = state.lock().await;
            if st.generation != generation {
                return;
            }
            match &mut st.phase {
                Phase::Ready(table) => table.apply_tick(&update.symbol, update.price),
                _ => false,
            }
        };
        if applied {
            revision.send_modify(|r| *r += 1);
        }
    }
}
