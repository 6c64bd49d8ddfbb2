//! vetting_supervisor
//!
//! Orchestrator-facing layer for `vetting_core`.
//!
//! Responsibilities:
//! - coerce raw model output into typed rubric inputs
//! - run the decision core per idea (deterministic)
//! - own per-idea usage ledgers, sharded by `idea_id`
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no scoring policy (lives in core)

pub mod adapter;
pub mod supervisor;

pub use adapter::{
    coerce_number,
    IdeaSubmission,
    JsonRubricBuilder,
    RubricBuilder,
    RubricKeys,
};

pub use supervisor::{
    LedgerSnapshot,
    RestoreStats,
    SupervisorCfg,
    VettingOutcome,
    VettingSupervisor,
};
