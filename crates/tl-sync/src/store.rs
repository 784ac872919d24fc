use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tl_remote::RemoteStore;
use tl_types::ItemList;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::dispatch;
use crate::error::{SyncError, SyncResult};
use crate::plan::SyncPlan;
use crate::types::{ListUpdate, LoadOutcome, StorePhase, StoreSnapshot, SyncReport};

/// An in-memory list kept eventually consistent with a remote ledger.
///
/// Reads and writes are synchronous: [`set`](Self::set) commits the new list
/// before any remote call is made, then reconciles the ledger on a spawned
/// task. Remote failures are logged and reported through
/// [`flush`](Self::flush), never surfaced to the writer.
pub struct SyncedListStore {
    remote: Arc<dyn RemoteStore>,
    config: SyncConfig,
    state: watch::Sender<StoreSnapshot>,
    runtime: Handle,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
    /// Reports of finished rounds not yet returned by `flush`, in completion order.
    completed: Arc<Mutex<Vec<SyncReport>>>,
    load_outcome: LoadOutcome,
}

impl SyncedListStore {
    /// Create the store and run the activation load.
    ///
    /// Returns once the list has been loaded from the ledger, or `initial`
    /// has been kept because the load failed. Must run inside a tokio runtime.
    pub async fn open(
        remote: Arc<dyn RemoteStore>,
        config: SyncConfig,
        initial: ItemList,
    ) -> SyncResult<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| SyncError::NoRuntime(e.to_string()))?;
        let (state, _) = watch::channel(StoreSnapshot {
            phase: StorePhase::Uninitialized,
            list: initial.clone(),
        });
        let mut store = Self {
            remote,
            config,
            state,
            runtime,
            in_flight: Mutex::new(Vec::new()),
            completed: Arc::new(Mutex::new(Vec::new())),
            load_outcome: LoadOutcome::Pending,
        };
        store.activate(initial).await;
        Ok(store)
    }

    async fn activate(&mut self, initial: ItemList) {
        self.state.send_modify(|s| s.phase = StorePhase::Loading);
        let (list, outcome) = dispatch::load(self.remote.as_ref(), &self.config, &initial).await;
        self.state.send_replace(StoreSnapshot {
            phase: StorePhase::Ready,
            list,
        });
        debug!(?outcome, "store ready");
        self.load_outcome = outcome;
    }

    /// The current visible list.
    pub fn get(&self) -> ItemList {
        self.state.borrow().list.clone()
    }

    pub fn phase(&self) -> StorePhase {
        self.state.borrow().phase
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Observe every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    /// Commit a replacement list or the result of an updater.
    pub fn set(&self, update: impl Into<ListUpdate>) {
        let update = update.into();
        self.commit(|current| update.resolve(current));
    }

    /// Commit `f(current)`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&ItemList) -> ItemList,
    {
        self.commit(f);
    }

    /// Number of sync tasks still running.
    pub fn pending(&self) -> usize {
        self.in_flight().iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every in-flight sync task, then return the reports of all
    /// rounds finished since the previous call, in completion order.
    pub async fn flush(&self) -> Vec<SyncReport> {
        let handles = std::mem::take(&mut *self.in_flight());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "sync task did not complete");
            }
        }
        std::mem::take(&mut *lock(&self.completed))
    }

    fn commit(&self, resolve: impl FnOnce(&ItemList) -> ItemList) {
        let policy = self.config.policy;
        let mut plan = None;
        self.state.send_modify(|snapshot| {
            let next = resolve(&snapshot.list);
            plan = Some(SyncPlan::compute(&snapshot.list, &next, policy));
            snapshot.list = next;
        });

        let Some(plan) = plan.filter(|p| !p.is_noop()) else {
            debug!("write has no remote effect");
            return;
        };
        debug!(remove = plan.remove.len(), upsert = plan.upsert.len(), "dispatching sync");

        let remote = Arc::clone(&self.remote);
        let type_tag = self.config.type_tag.clone();
        let completed = Arc::clone(&self.completed);
        let handle = self.runtime.spawn(async move {
            let report = dispatch::execute(remote.as_ref(), plan, &type_tag).await;
            if report.is_clean() {
                info!(
                    removed = report.removed,
                    upserted = report.upserted,
                    bootstrapped = report.bootstrapped,
                    "sync round complete"
                );
            } else {
                warn!(failures = report.failures.len(), "sync round finished with failures");
            }
            lock(&completed).push(report);
        });

        let mut in_flight = self.in_flight();
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }

    fn in_flight(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        lock(&self.in_flight)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl std::fmt::Debug for SyncedListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.state.borrow();
        f.debug_struct("SyncedListStore")
            .field("phase", &snapshot.phase)
            .field("items", &snapshot.list.len())
            .field("policy", &self.config.policy)
            .finish()
    }
}
