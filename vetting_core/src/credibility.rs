use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::normalize::{host_of, strip_www};

// ---------------------------------------------------------------------
// Domain credibility: a deterministic trust tier per source URL, so the
// advisory credibility an upstream model attaches to evidence never
// reaches scoring.
// ---------------------------------------------------------------------

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 5;
/// Tier for anything the table does not recognise.
pub const DEFAULT_TIER: u8 = 2;
/// Tier forced on URLs that look like "best X tools" listicles.
pub const LISTICLE_TIER: u8 = 1;
/// Hosts at or above this tier count as review sources for evidence strength.
pub const HIGH_CREDIBILITY_TIER: u8 = 4;

/// Built-in tiers. Review aggregators and analyst firms sit at the top,
/// communities in the middle, open publishing platforms near the bottom.
pub const BUILTIN_TIERS: &[(&str, u8)] = &[
    // Review platforms and analysts.
    ("g2.com", 5),
    ("capterra.com", 5),
    ("trustradius.com", 5),
    ("gartner.com", 5),
    ("forrester.com", 5),
    ("sec.gov", 5),
    ("getapp.com", 4),
    ("softwareadvice.com", 4),
    ("trustpilot.com", 4),
    ("statista.com", 4),
    ("crunchbase.com", 4),
    ("producthunt.com", 4),
    ("techcrunch.com", 4),
    // Communities and Q&A.
    ("reddit.com", 3),
    ("ycombinator.com", 3),
    ("stackoverflow.com", 3),
    ("stackexchange.com", 3),
    ("github.com", 3),
    ("indiehackers.com", 3),
    ("linkedin.com", 3),
    // Open publishing.
    ("medium.com", 2),
    ("quora.com", 2),
    ("substack.com", 2),
    ("youtube.com", 2),
    ("twitter.com", 2),
    ("x.com", 2),
];

/// Built-in listicle detectors, matched case-insensitively against the whole URL.
pub const BUILTIN_LISTICLE_PATTERNS: &[&str] = &[
    r"/best.*tools",
    r"/top[-_]?\d+",
    r"\d+[-_]?best",
    r"best.*software",
];

static BUILTIN_LISTICLE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BUILTIN_LISTICLE_PATTERNS
        .iter()
        .filter_map(|p| match compile_listicle(p) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(pattern = %p, error = %err, "skipping listicle pattern");
                None
            }
        })
        .collect()
});

static BUILTIN_TABLE: LazyLock<DomainCredibilityTable> = LazyLock::new(|| {
    let mut table = DomainCredibilityTable::new(DEFAULT_TIER);
    for (domain, tier) in BUILTIN_TIERS {
        table = table.with_tier(*domain, *tier);
    }
    for re in BUILTIN_LISTICLE.iter() {
        table = table.with_listicle_pattern(re.clone());
    }
    table
});

/// Compile a listicle detector the way the table expects it (case-insensitive).
pub fn compile_listicle(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Shared read-only built-in table.
pub fn builtin_table() -> &'static DomainCredibilityTable {
    &BUILTIN_TABLE
}

/// `credibility_of` against the built-in table.
pub fn credibility_of(url: &str) -> u8 {
    BUILTIN_TABLE.credibility_of(url)
}

/// Immutable mapping from registrable domain to trust tier, plus listicle
/// detectors. Build it once, then share it by reference or `Arc`.
#[derive(Clone, Debug)]
pub struct DomainCredibilityTable {
    tiers: HashMap<String, u8>,
    listicle: Vec<Regex>,
    default_tier: u8,
}

impl DomainCredibilityTable {
    /// Empty table: every URL resolves to `default_tier` (clamped to 1..=5).
    pub fn new(default_tier: u8) -> Self {
        Self {
            tiers: HashMap::new(),
            listicle: Vec::new(),
            default_tier: clamp_tier(default_tier),
        }
    }

    /// The built-in table (owned copy).
    pub fn builtin() -> Self {
        BUILTIN_TABLE.clone()
    }

    /// Add or replace a domain's tier. The domain is lower-cased and a
    /// leading `www.` is dropped; the tier is clamped to 1..=5.
    pub fn with_tier(mut self, domain: impl AsRef<str>, tier: u8) -> Self {
        let domain = domain.as_ref().trim().to_ascii_lowercase();
        self.tiers
            .insert(strip_www(&domain).to_string(), clamp_tier(tier));
        self
    }

    pub fn with_listicle_pattern(mut self, re: Regex) -> Self {
        self.listicle.push(re);
        self
    }

    pub fn default_tier(&self) -> u8 {
        self.default_tier
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Exact host lookup, then the last two labels when the host has more
    /// than two (`old.g2.com` -> `g2.com`).
    pub fn tier_for_host(&self, host: &str) -> Option<u8> {
        let host = strip_www(host);
        if let Some(tier) = self.tiers.get(host) {
            return Some(*tier);
        }
        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() > 2 {
            let parent = labels[labels.len() - 2..].join(".");
            return self.tiers.get(&parent).copied();
        }
        None
    }

    pub fn is_listicle(&self, url: &str) -> bool {
        self.listicle.iter().any(|re| re.is_match(url))
    }

    /// Trust tier for `url`. Pure and total: unparseable URLs get the
    /// default tier, known hosts win over listicle detection.
    pub fn credibility_of(&self, url: &str) -> u8 {
        let Some(host) = host_of(url) else {
            return self.default_tier;
        };
        if let Some(tier) = self.tier_for_host(&host) {
            return tier;
        }
        if self.is_listicle(url) {
            return LISTICLE_TIER;
        }
        self.default_tier
    }

    /// True when the URL's host is a tier-4/5 domain. Listicle detection
    /// plays no part here.
    pub fn is_high_credibility(&self, url: &str) -> bool {
        host_of(url)
            .and_then(|h| self.tier_for_host(&h))
            .is_some_and(|t| t >= HIGH_CREDIBILITY_TIER)
    }
}

impl Default for DomainCredibilityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[inline]
fn clamp_tier(tier: u8) -> u8 {
    tier.clamp(MIN_TIER, MAX_TIER)
}
