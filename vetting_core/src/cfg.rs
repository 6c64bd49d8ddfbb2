use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::credibility::{
    compile_listicle, DomainCredibilityTable, BUILTIN_LISTICLE_PATTERNS, BUILTIN_TIERS,
    DEFAULT_TIER, MAX_TIER, MIN_TIER,
};
use crate::error::{ConfigError, ConfigResult};

/// Declarative form of a [`DomainCredibilityTable`], loadable from TOML:
///
/// ```toml
/// default_tier = 2
/// listicle_patterns = ["/best.*tools"]
///
/// [tiers]
/// "g2.com" = 5
/// ```
///
/// Missing keys fall back to the built-in values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CredibilityCfg {
    pub default_tier: u8,
    pub tiers: BTreeMap<String, u8>,
    pub listicle_patterns: Vec<String>,
}

impl Default for CredibilityCfg {
    fn default() -> Self {
        Self {
            default_tier: DEFAULT_TIER,
            tiers: BUILTIN_TIERS
                .iter()
                .map(|(d, t)| (d.to_string(), *t))
                .collect(),
            listicle_patterns: BUILTIN_LISTICLE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl CredibilityCfg {
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validate and compile into an immutable table.
    pub fn build(&self) -> ConfigResult<DomainCredibilityTable> {
        check_tier("<default>", self.default_tier)?;

        let mut table = DomainCredibilityTable::new(self.default_tier);
        for (domain, tier) in &self.tiers {
            check_tier(domain, *tier)?;
            table = table.with_tier(domain, *tier);
        }
        for pattern in &self.listicle_patterns {
            let re = compile_listicle(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            table = table.with_listicle_pattern(re);
        }
        Ok(table)
    }
}

impl TryFrom<&CredibilityCfg> for DomainCredibilityTable {
    type Error = ConfigError;

    fn try_from(cfg: &CredibilityCfg) -> ConfigResult<Self> {
        cfg.build()
    }
}

impl DomainCredibilityTable {
    /// Parse TOML and build in one step.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        CredibilityCfg::from_toml_str(s)?.build()
    }
}

fn check_tier(domain: &str, tier: u8) -> ConfigResult<()> {
    if (MIN_TIER..=MAX_TIER).contains(&tier) {
        Ok(())
    } else {
        Err(ConfigError::TierOutOfRange {
            domain: domain.to_string(),
            tier,
        })
    }
}
