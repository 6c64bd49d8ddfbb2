pub mod evidence;
pub mod normalize;
pub mod credibility;

pub mod consolidate;
pub mod rubric;
pub mod decide;
pub mod pipeline;
pub mod usage;

pub mod cfg;
pub mod error;

pub use evidence::{EvidenceRecord, Sentiment, WedgeOption};
pub use credibility::{builtin_table, credibility_of, DomainCredibilityTable};

pub use consolidate::{consolidate, prefer_candidate, unique_domain_count, ConsolidatedEvidence};
pub use rubric::{clamp_dimension, ExternalScores, RubricScores};
pub use decide::{apply_kill_rules, evidence_strength, Decision, KillRuleResult};
pub use pipeline::{decide, DecisionPacket, FinalRubric};
pub use usage::{ModelCall, UsageCounter};

pub use cfg::CredibilityCfg;
pub use error::{ConfigError, ConfigResult};
