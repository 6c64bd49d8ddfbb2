//! Domain adapter layer: turn raw upstream model output into typed
//! `vetting_core` inputs.
//!
//! This module is intentionally small and policy-light:
//! - No IO
//! - No async
//! - No scoring rules (those live in core)
//!
//! Orchestrators provide a `RubricBuilder` (or use `JsonRubricBuilder`) to map
//! a raw analysis payload into `ExternalScores`.

use std::borrow::Cow;

use serde_json::Value;

use vetting_core::{Decision, EvidenceRecord, ExternalScores, WedgeOption};

/// One idea as the orchestrator hands it over after its research and
/// analysis steps.
#[derive(Clone, Debug)]
pub struct IdeaSubmission<'a> {
    /// Stable key for the idea (slug, row id, etc.).
    pub idea_id: Cow<'a, str>,
    pub evidence: Vec<EvidenceRecord>,
    /// Raw analysis payload; only rubric dimension keys are read from it.
    pub analysis: Value,
    pub wedge_options: Vec<WedgeOption>,
    /// Decision text as the model phrased it.
    pub suggested_decision: Cow<'a, str>,
}

impl<'a> IdeaSubmission<'a> {
    pub fn new(idea_id: impl Into<Cow<'a, str>>) -> Self {
        Self {
            idea_id: idea_id.into(),
            evidence: Vec::new(),
            analysis: Value::Null,
            wedge_options: Vec::new(),
            suggested_decision: Cow::Borrowed("UNCLEAR"),
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<EvidenceRecord>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_analysis(mut self, analysis: Value) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_wedge_options(mut self, wedges: Vec<WedgeOption>) -> Self {
        self.wedge_options = wedges;
        self
    }

    pub fn with_suggested_decision(mut self, decision: impl Into<Cow<'a, str>>) -> Self {
        self.suggested_decision = decision.into();
        self
    }

    pub fn suggested(&self) -> Decision {
        Decision::parse_lenient(&self.suggested_decision)
    }
}

/// Trait: map a raw analysis payload into the seven externally scored dimensions.
pub trait RubricBuilder {
    fn build(&self, analysis: &Value) -> ExternalScores;
}

/// Keys looked up by `JsonRubricBuilder`.
#[derive(Clone, Debug)]
pub struct RubricKeys {
    pub pain_intensity: &'static str,
    pub frequency: &'static str,
    pub buyer_clarity: &'static str,
    pub budget_signal: &'static str,
    pub switching_cost: &'static str,
    pub competition: &'static str,
    pub distribution_feasibility: &'static str,
}

impl Default for RubricKeys {
    fn default() -> Self {
        Self {
            pain_intensity: "painIntensity",
            frequency: "frequency",
            buyer_clarity: "buyerClarity",
            budget_signal: "budgetSignal",
            switching_cost: "switchingCost",
            competition: "competition",
            distribution_feasibility: "distributionFeasibility",
        }
    }
}

/// Reads dimensions from a JSON object, optionally nested under `scope`
/// (e.g. `{"rubric": {...}}`). `evidenceStrength` and `total` are never
/// read, whatever the payload says.
#[derive(Clone, Debug, Default)]
pub struct JsonRubricBuilder {
    pub keys: RubricKeys,
    pub scope: Option<&'static str>,
}

impl JsonRubricBuilder {
    pub fn scoped(scope: &'static str) -> Self {
        Self {
            keys: RubricKeys::default(),
            scope: Some(scope),
        }
    }
}

impl RubricBuilder for JsonRubricBuilder {
    fn build(&self, analysis: &Value) -> ExternalScores {
        let obj = match self.scope {
            Some(scope) => analysis.get(scope).unwrap_or(&Value::Null),
            None => analysis,
        };
        let dim = |key: &str| coerce_number(obj.get(key));

        ExternalScores {
            pain_intensity: dim(self.keys.pain_intensity),
            frequency: dim(self.keys.frequency),
            buyer_clarity: dim(self.keys.buyer_clarity),
            budget_signal: dim(self.keys.budget_signal),
            switching_cost: dim(self.keys.switching_cost),
            competition: dim(self.keys.competition),
            distribution_feasibility: dim(self.keys.distribution_feasibility),
        }
    }
}

/// Numbers pass through, numeric strings are parsed, everything else
/// (missing, null, bool, objects, garbage text) is 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}
