use serde::{Deserialize, Serialize};

pub const DIMENSION_MIN: u8 = 0;
pub const DIMENSION_MAX: u8 = 5;
/// Eight dimensions at most 5 each.
pub const TOTAL_MAX: u8 = 40;

/// The seven rubric dimensions an upstream analysis step is allowed to
/// suggest. Values are raw: possibly fractional, negative, huge or NaN.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalScores {
    pub pain_intensity: f64,
    pub frequency: f64,
    pub buyer_clarity: f64,
    pub budget_signal: f64,
    pub switching_cost: f64,
    pub competition: f64,
    pub distribution_feasibility: f64,
}

impl ExternalScores {
    /// Every dimension set to `v`.
    pub fn uniform(v: f64) -> Self {
        Self {
            pain_intensity: v,
            frequency: v,
            buyer_clarity: v,
            budget_signal: v,
            switching_cost: v,
            competition: v,
            distribution_feasibility: v,
        }
    }
}

/// Round to the nearest integer and clamp into 0..=5. Non-finite input is 0.
#[inline]
pub fn clamp_dimension(raw: f64) -> u8 {
    if !raw.is_finite() {
        return DIMENSION_MIN;
    }
    raw.round()
        .clamp(f64::from(DIMENSION_MIN), f64::from(DIMENSION_MAX)) as u8
}

/// The full eight-dimension rubric. Every field is in 0..=5.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RubricScores {
    pub pain_intensity: u8,
    pub frequency: u8,
    pub buyer_clarity: u8,
    pub budget_signal: u8,
    pub switching_cost: u8,
    pub competition: u8,
    pub distribution_feasibility: u8,
    pub evidence_strength: u8,
}

impl RubricScores {
    /// Clamp the upstream suggestions and attach the locally computed
    /// evidence strength. There is deliberately no way to pass an upstream
    /// evidence strength in.
    pub fn from_external(ext: &ExternalScores, evidence_strength: u8) -> Self {
        Self {
            pain_intensity: clamp_dimension(ext.pain_intensity),
            frequency: clamp_dimension(ext.frequency),
            buyer_clarity: clamp_dimension(ext.buyer_clarity),
            budget_signal: clamp_dimension(ext.budget_signal),
            switching_cost: clamp_dimension(ext.switching_cost),
            competition: clamp_dimension(ext.competition),
            distribution_feasibility: clamp_dimension(ext.distribution_feasibility),
            evidence_strength: evidence_strength.min(DIMENSION_MAX),
        }
    }

    /// Every dimension set to `v` (clamped).
    pub fn uniform(v: u8) -> Self {
        let v = v.min(DIMENSION_MAX);
        Self {
            pain_intensity: v,
            frequency: v,
            buyer_clarity: v,
            budget_signal: v,
            switching_cost: v,
            competition: v,
            distribution_feasibility: v,
            evidence_strength: v,
        }
    }

    pub fn dimensions(&self) -> [u8; 8] {
        [
            self.pain_intensity,
            self.frequency,
            self.buyer_clarity,
            self.budget_signal,
            self.switching_cost,
            self.competition,
            self.distribution_feasibility,
            self.evidence_strength,
        ]
    }

    /// Sum of the eight dimensions, 0..=40. Always recomputed here; an
    /// upstream total is never used.
    pub fn total(&self) -> u8 {
        let sum: u16 = self
            .dimensions()
            .iter()
            .map(|d| u16::from((*d).min(DIMENSION_MAX)))
            .sum();
        sum.min(u16::from(TOTAL_MAX)) as u8
    }
}
