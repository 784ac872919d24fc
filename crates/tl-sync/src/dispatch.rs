//! Remote side of the store: the activation load and the execution of
//! sync plans, including the missing-ledger bootstrap.

use tl_remote::{CreateOutcome, QueryPattern, RemoteError, RemoteStore};
use tl_types::{ItemList, WireRecord};
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::plan::SyncPlan;
use crate::types::{LoadOutcome, SyncReport};

/// Query every list item from the ledger.
///
/// Falls back to `initial` on any failure. A missing ledger is created
/// (seeded with `initial`) when the config allows it.
pub(crate) async fn load(
    remote: &dyn RemoteStore,
    config: &SyncConfig,
    initial: &ItemList,
) -> (ItemList, LoadOutcome) {
    let pattern = QueryPattern::all_of_type(&config.type_tag);
    let rows = match remote.query(&pattern).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "loading list from ledger failed, using initial list");
            let bootstrapped = e.is_ledger_missing()
                && config.bootstrap_on_load
                && matches!(
                    bootstrap(remote, initial, &config.type_tag).await,
                    Ok((CreateOutcome::Created, _))
                );
            let outcome = LoadOutcome::Fallback {
                reason: e.to_string(),
                bootstrapped,
            };
            return (initial.clone(), outcome);
        }
    };

    let total = rows.len();
    let decoded = rows.into_iter().filter_map(|row| {
        match WireRecord::from_value(row).and_then(WireRecord::decode) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "skipping undecodable ledger record");
                None
            }
        }
    });
    let (list, duplicates) = ItemList::collect_unique(decoded);
    if duplicates > 0 {
        warn!(duplicates, "ledger returned duplicate ids, kept first occurrence");
    }

    info!(loaded = list.len(), "list loaded from ledger");
    let outcome = LoadOutcome::Remote {
        loaded: list.len(),
        skipped: total - list.len(),
    };
    (list, outcome)
}

/// Run a plan against the ledger. Never fails; problems end up in the report.
pub(crate) async fn execute(remote: &dyn RemoteStore, plan: SyncPlan, type_tag: &str) -> SyncReport {
    let mut report = SyncReport::default();

    if !plan.remove.is_empty() {
        match remote.remove(&plan.remove).await {
            Ok(()) => report.removed = plan.remove.len(),
            Err(e) if e.is_ledger_missing() => {
                recover(remote, &plan, type_tag, &mut report).await;
                return report;
            }
            Err(e) => {
                warn!(error = %e, count = plan.remove.len(), "remote delete failed");
                report.failures.push(e);
            }
        }
    }

    if !plan.upsert.is_empty() {
        let records = WireRecord::encode_all(&plan.upsert, type_tag);
        match remote.transact(&records).await {
            Ok(()) => report.upserted = records.len(),
            Err(e) if e.is_ledger_missing() => {
                recover(remote, &plan, type_tag, &mut report).await;
            }
            Err(e) => {
                warn!(error = %e, count = records.len(), "remote upsert failed");
                report.failures.push(e);
            }
        }
    }

    report
}

/// One bootstrap attempt with the full snapshot. Not retried.
async fn recover(remote: &dyn RemoteStore, plan: &SyncPlan, type_tag: &str, report: &mut SyncReport) {
    info!(seed = plan.snapshot.len(), "ledger missing, creating it");
    match bootstrap(remote, &plan.snapshot, type_tag).await {
        Ok((CreateOutcome::Created, seeded)) => {
            report.bootstrapped = true;
            report.seeded = seeded;
        }
        // Another write created the ledger first and its seed was not ours.
        Ok((CreateOutcome::AlreadyExists, _)) => replay(remote, plan, type_tag, report).await,
        Err(e) => report.failures.push(e),
    }
}

/// Apply the plan's removals and the full snapshot to a ledger that exists.
async fn replay(remote: &dyn RemoteStore, plan: &SyncPlan, type_tag: &str, report: &mut SyncReport) {
    debug!("ledger already created, replaying write");
    if !plan.remove.is_empty() {
        match remote.remove(&plan.remove).await {
            Ok(()) => report.removed = plan.remove.len(),
            Err(e) => {
                warn!(error = %e, count = plan.remove.len(), "remote delete failed");
                report.failures.push(e);
            }
        }
    }
    if !plan.snapshot.is_empty() {
        let records = WireRecord::encode_all(&plan.snapshot, type_tag);
        match remote.transact(&records).await {
            Ok(()) => report.upserted = records.len(),
            Err(e) => {
                warn!(error = %e, count = records.len(), "remote upsert failed");
                report.failures.push(e);
            }
        }
    }
}

async fn bootstrap(
    remote: &dyn RemoteStore,
    seed: &ItemList,
    type_tag: &str,
) -> Result<(CreateOutcome, usize), RemoteError> {
    let records = WireRecord::encode_all(seed, type_tag);
    let seed_records = (!records.is_empty()).then_some(records.as_slice());
    match remote.create_ledger(seed_records).await {
        Ok(CreateOutcome::Created) => {
            debug!(seeded = records.len(), "ledger created");
            Ok((CreateOutcome::Created, records.len()))
        }
        Ok(CreateOutcome::AlreadyExists) => Ok((CreateOutcome::AlreadyExists, 0)),
        Err(e) => {
            error!(error = %e, "creating ledger failed");
            Err(e)
        }
    }
}
