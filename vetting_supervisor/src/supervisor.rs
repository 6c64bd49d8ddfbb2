//! Sharded vetting supervisor.
//!
//! This is the orchestrator-facing layer around `vetting_core`:
//! - holds the shared credibility table
//! - owns per-idea usage ledgers
//! - runs the decision core for each submitted idea
//!
//! No IO. No async. Concurrency is achieved by sharding ledgers by `idea_id`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use vetting_core::{decide, DecisionPacket, DomainCredibilityTable, ModelCall, UsageCounter};

use crate::adapter::{IdeaSubmission, RubricBuilder};

/// Supervisor settings.
#[derive(Clone, Debug)]
pub struct SupervisorCfg {
    /// Number of ledger shards; values below 1 are treated as 1.
    pub shards: usize,
}

impl Default for SupervisorCfg {
    fn default() -> Self {
        Self { shards: 1 }
    }
}

/// Result for one idea.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VettingOutcome {
    pub idea_id: String,
    pub packet: DecisionPacket,
    /// Usage recorded for this idea at the time of the decision.
    pub usage: UsageCounter,
}

/// Snapshot of ledger state for storage-agnostic persistence.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LedgerSnapshot {
    pub ledgers: Vec<(String, UsageCounter)>,
}

/// Counters returned by restore operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestoreStats {
    /// Ledgers applied from the snapshot.
    pub applied: usize,
    /// Existing ledgers that were overwritten.
    pub overwritten: usize,
}

#[derive(Default, Debug)]
struct Shard {
    ledgers: HashMap<String, UsageCounter>,
}

/// Deterministic FNV-1a hash (stable across runs).
fn fnv1a_u64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn shard_index(idea_id: &str, shard_count: usize) -> usize {
    if shard_count <= 1 {
        return 0;
    }
    (fnv1a_u64(idea_id) as usize) % shard_count
}

/// Runs the decision core for batches of ideas and keeps per-idea usage.
///
/// The supervisor never mutates the credibility table; it can be shared with
/// other supervisors through the `Arc`.
#[derive(Debug)]
pub struct VettingSupervisor {
    table: Arc<DomainCredibilityTable>,
    shards: usize,
    ledger_shards: Vec<Mutex<Shard>>,
}

impl VettingSupervisor {
    pub fn new(cfg: SupervisorCfg, table: Arc<DomainCredibilityTable>) -> Self {
        let shards = cfg.shards.max(1);
        let ledger_shards = (0..shards).map(|_| Mutex::new(Shard::default())).collect();
        Self {
            table,
            shards,
            ledger_shards,
        }
    }

    /// Supervisor over the built-in credibility table.
    pub fn with_builtin_table(cfg: SupervisorCfg) -> Self {
        Self::new(cfg, Arc::new(DomainCredibilityTable::builtin()))
    }

    pub fn table(&self) -> &DomainCredibilityTable {
        &self.table
    }

    fn lock(&self, idx: usize) -> MutexGuard<'_, Shard> {
        // Ledgers hold plain counters; recover them from a poisoned lock.
        self.ledger_shards[idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn shard_for(&self, idea_id: &str) -> MutexGuard<'_, Shard> {
        self.lock(shard_index(idea_id, self.shards))
    }

    /// Add one model call to an idea's ledger.
    pub fn record_usage(&self, idea_id: &str, call: ModelCall) {
        let mut guard = self.shard_for(idea_id);
        guard
            .ledgers
            .entry(idea_id.to_string())
            .or_default()
            .record(call);
    }

    /// Current usage for an idea (zero if nothing was recorded).
    pub fn usage_for(&self, idea_id: &str) -> UsageCounter {
        self.shard_for(idea_id)
            .ledgers
            .get(idea_id)
            .copied()
            .unwrap_or_default()
    }

    /// Sum of every ledger.
    pub fn total_usage(&self) -> UsageCounter {
        let mut total = UsageCounter::default();
        for idx in 0..self.shards {
            for usage in self.lock(idx).ledgers.values() {
                total.merge(usage);
            }
        }
        total
    }

    /// Drop a single idea's ledger.
    pub fn clear_idea(&self, idea_id: &str) {
        self.shard_for(idea_id).ledgers.remove(idea_id);
    }

    /// Export all ledgers, sorted by `idea_id`.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.snapshot_filtered(|_, _| true)
    }

    /// Export ledgers matching `predicate`, sorted by `idea_id`.
    pub fn snapshot_filtered<F>(&self, mut predicate: F) -> LedgerSnapshot
    where
        F: FnMut(&str, &UsageCounter) -> bool,
    {
        let mut out: Vec<(String, UsageCounter)> = Vec::new();
        for idx in 0..self.shards {
            let guard = self.lock(idx);
            for (k, v) in guard.ledgers.iter() {
                if predicate(k.as_str(), v) {
                    out.push((k.clone(), *v));
                }
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        LedgerSnapshot { ledgers: out }
    }

    /// Export only the listed ideas, sorted by `idea_id`.
    pub fn snapshot_ideas(&self, idea_ids: &[&str]) -> LedgerSnapshot {
        let want: HashSet<&str> = idea_ids.iter().copied().collect();
        self.snapshot_filtered(|id, _| want.contains(id))
    }

    /// Replace all ledgers with the snapshot's.
    pub fn restore(&self, snap: LedgerSnapshot) -> RestoreStats {
        for idx in 0..self.shards {
            self.lock(idx).ledgers.clear();
        }
        self.restore_merge(snap)
    }

    /// Merge a snapshot into the current ledgers; snapshot entries win.
    pub fn restore_merge(&self, snap: LedgerSnapshot) -> RestoreStats {
        let mut stats = RestoreStats::default();
        for (idea_id, usage) in snap.ledgers {
            let mut guard = self.shard_for(&idea_id);
            if guard.ledgers.insert(idea_id, usage).is_some() {
                stats.overwritten += 1;
            }
            stats.applied += 1;
        }
        stats
    }

    /// Vet one idea.
    pub fn vet_one<B: RubricBuilder>(
        &self,
        builder: &B,
        idea: &IdeaSubmission<'_>,
    ) -> VettingOutcome {
        let external = builder.build(&idea.analysis);
        let suggested = idea.suggested();
        let packet = decide(
            &idea.evidence,
            &external,
            &idea.wedge_options,
            suggested,
            &self.table,
        );

        info!(
            idea_id = %idea.idea_id,
            suggested = %suggested,
            decision = %packet.rubric.decision,
            total = packet.rubric.total,
            overridden = packet.rubric.overridden,
            "idea vetted"
        );

        VettingOutcome {
            idea_id: idea.idea_id.to_string(),
            usage: self.usage_for(&idea.idea_id),
            packet,
        }
    }

    /// Vet a batch of ideas. Output is sorted by `idea_id`; a repeated
    /// `idea_id` keeps only its last submission.
    pub fn vet<B: RubricBuilder>(
        &self,
        builder: &B,
        ideas: &[IdeaSubmission<'_>],
    ) -> Vec<VettingOutcome> {
        let mut latest: HashMap<&str, &IdeaSubmission<'_>> = HashMap::new();
        for idea in ideas {
            latest.insert(&*idea.idea_id, idea);
        }
        debug!(submitted = ideas.len(), distinct = latest.len(), "vetting batch");

        let mut out: Vec<VettingOutcome> = latest
            .into_values()
            .map(|idea| self.vet_one(builder, idea))
            .collect();
        out.sort_by(|a, b| a.idea_id.cmp(&b.idea_id));
        out
    }
}
