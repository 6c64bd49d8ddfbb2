//! The three stages in their only valid order:
//! consolidate -> evidence strength -> kill rules.

use serde::{Deserialize, Serialize};

use crate::consolidate::{consolidate, ConsolidatedEvidence};
use crate::credibility::DomainCredibilityTable;
use crate::decide::{apply_kill_rules, evidence_strength, Decision};
use crate::evidence::{EvidenceRecord, WedgeOption};
use crate::rubric::{ExternalScores, RubricScores};

/// Scores, recomputed total and enforced decision.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinalRubric {
    pub scores: RubricScores,
    pub total: u8,
    pub decision: Decision,
    pub overridden: bool,
    pub override_reasons: Vec<String>,
}

/// Everything the downstream report/persistence layer receives for one idea.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPacket {
    pub rubric: FinalRubric,
    pub consolidated_evidence: Vec<EvidenceRecord>,
    pub unique_domain_count: usize,
    pub removed_count: usize,
}

/// Run the full decision core for one idea.
pub fn decide(
    evidence: &[EvidenceRecord],
    external: &ExternalScores,
    wedge_options: &[WedgeOption],
    suggested: Decision,
    table: &DomainCredibilityTable,
) -> DecisionPacket {
    let ConsolidatedEvidence {
        records,
        unique_domain_count,
        removed_count,
    } = consolidate(evidence, table);

    let strength = evidence_strength(&records, table);
    let scores = RubricScores::from_external(external, strength);
    let verdict = apply_kill_rules(&scores, wedge_options.len(), records.len(), suggested);

    DecisionPacket {
        rubric: FinalRubric {
            scores,
            total: scores.total(),
            decision: verdict.decision,
            overridden: verdict.overridden,
            override_reasons: verdict.reasons,
        },
        consolidated_evidence: records,
        unique_domain_count,
        removed_count,
    }
}
