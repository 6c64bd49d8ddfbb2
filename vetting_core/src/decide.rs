//! Decision engine: evidence strength, and the kill rules that bound what an
//! upstream suggestion can get away with.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::credibility::{DomainCredibilityTable, LISTICLE_TIER};
use crate::evidence::EvidenceRecord;
use crate::normalize::domain_key;
use crate::rubric::{RubricScores, DIMENSION_MAX};

/// Final verdict for an idea.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Go,
    NoGo,
    Unclear,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Go => "GO",
            Decision::NoGo => "NO_GO",
            Decision::Unclear => "UNCLEAR",
        }
    }

    /// Read a decision out of model text. Case, spaces, `-` and `_` are
    /// ignored; anything unrecognised is `Unclear`.
    pub fn parse_lenient(raw: &str) -> Decision {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "go" | "yes" => Decision::Go,
            "nogo" | "no" | "kill" => Decision::NoGo,
            _ => Decision::Unclear,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const REASON_INSUFFICIENT_EVIDENCE: &str = "insufficient evidence to proceed.";
pub const REASON_NO_DISTRIBUTION: &str = "no clear way to reach buyers.";
pub const REASON_SATURATED_MARKET: &str = "market is saturated with no differentiation path.";
pub const REASON_UNKNOWN_BUYER: &str = "cannot determine buyer — insufficient evidence.";

/// A dimension at or below this value trips its kill rule.
pub const KILL_FLOOR: u8 = 1;
/// Below this many records a weak buyer signal means UNCLEAR.
pub const MIN_EVIDENCE_FOR_BUYER: usize = 10;

// Evidence strength constants.
pub const RECORDS_PER_POINT: usize = 6;
pub const DOMAIN_BONUS_MIN: usize = 5;
pub const REVIEW_BONUS_MIN: usize = 2;
pub const LOW_CRED_RATIO_MAX: f64 = 0.4;
pub const THIN_EVIDENCE_BELOW: usize = 10;

/// Outcome of [`apply_kill_rules`]. Built fresh on every call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KillRuleResult {
    pub decision: Decision,
    pub overridden: bool,
    pub reasons: Vec<String>,
}

/// Evidence strength in 0..=5, computed only from consolidated records.
///
/// `base = min(count / 6, 5)`, then +1 for five or more distinct domains,
/// +1 for two or more review-source records, -1 when more than 40% of records
/// are listicle-tier, -1 below ten records. Quantity saturates: past 60
/// records only the two bonuses can still move the score.
pub fn evidence_strength(records: &[EvidenceRecord], table: &DomainCredibilityTable) -> u8 {
    let count = records.len();
    if count == 0 {
        return 0;
    }

    let unique_domains = records
        .iter()
        .map(|r| domain_key(&r.url))
        .collect::<HashSet<_>>()
        .len();
    let review_sources = records
        .iter()
        .filter(|r| table.is_high_credibility(&r.url))
        .count();
    let low_cred = records
        .iter()
        .filter(|r| r.credibility <= LISTICLE_TIER)
        .count();
    let low_cred_ratio = low_cred as f64 / count as f64;

    let mut score = (count / RECORDS_PER_POINT).min(usize::from(DIMENSION_MAX)) as i32;
    if unique_domains >= DOMAIN_BONUS_MIN {
        score += 1;
    }
    if review_sources >= REVIEW_BONUS_MIN {
        score += 1;
    }
    if low_cred_ratio > LOW_CRED_RATIO_MAX {
        score -= 1;
    }
    if count < THIN_EVIDENCE_BELOW {
        score -= 1;
    }

    let strength = score.clamp(0, i32::from(DIMENSION_MAX)) as u8;
    debug!(
        count,
        unique_domains,
        review_sources,
        low_cred_ratio,
        strength,
        "evidence strength computed"
    );
    strength
}

/// Enforce the kill rules over a suggested decision.
///
/// The hard failures (weak evidence, no distribution, saturated market with
/// no wedge) are collected together and force NO_GO. Only when none fire is
/// the softer unknown-buyer rule checked, which forces UNCLEAR.
pub fn apply_kill_rules(
    rubric: &RubricScores,
    wedge_option_count: usize,
    evidence_count: usize,
    suggested: Decision,
) -> KillRuleResult {
    let mut reasons: Vec<String> = Vec::new();

    if rubric.evidence_strength <= KILL_FLOOR {
        reasons.push(REASON_INSUFFICIENT_EVIDENCE.to_string());
    }
    if rubric.distribution_feasibility <= KILL_FLOOR {
        reasons.push(REASON_NO_DISTRIBUTION.to_string());
    }
    if rubric.competition <= KILL_FLOOR && wedge_option_count == 0 {
        reasons.push(REASON_SATURATED_MARKET.to_string());
    }

    let result = if !reasons.is_empty() {
        KillRuleResult {
            decision: Decision::NoGo,
            overridden: suggested != Decision::NoGo,
            reasons,
        }
    } else if rubric.buyer_clarity <= KILL_FLOOR && evidence_count < MIN_EVIDENCE_FOR_BUYER {
        // A suggested UNCLEAR or NO_GO does not count as overridden.
        KillRuleResult {
            decision: Decision::Unclear,
            overridden: suggested == Decision::Go,
            reasons: vec![REASON_UNKNOWN_BUYER.to_string()],
        }
    } else {
        KillRuleResult {
            decision: suggested,
            overridden: false,
            reasons: Vec::new(),
        }
    };

    if result.overridden {
        info!(
            suggested = %suggested,
            decision = %result.decision,
            reasons = ?result.reasons,
            "kill rule overrode suggested decision"
        );
    }
    result
}
