use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credibility::DomainCredibilityTable;
use crate::evidence::EvidenceRecord;
use crate::normalize::{domain_key, normalize_quote, normalize_url};

/// Output of [`consolidate`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedEvidence {
    pub records: Vec<EvidenceRecord>,
    pub unique_domain_count: usize,
    pub removed_count: usize,
}

/// Whether `candidate` should take the slot currently held by `kept` for the
/// same normalized URL: higher advisory credibility first, then the longer
/// quote. Equal on both keeps the incumbent.
pub fn prefer_candidate(candidate: &EvidenceRecord, kept: &EvidenceRecord) -> bool {
    rank(candidate, kept) == Ordering::Greater
}

fn rank(a: &EvidenceRecord, b: &EvidenceRecord) -> Ordering {
    a.credibility
        .cmp(&b.credibility)
        .then_with(|| a.quote.chars().count().cmp(&b.quote.chars().count()))
}

/// Deduplicate evidence, then assign every survivor its table credibility.
///
/// Records are visited in input order. A normalized quote seen before (under
/// any URL) drops the record. A normalized URL seen before collapses into
/// the existing slot, which keeps whichever record [`prefer_candidate`]
/// ranks higher. Both count as removed.
pub fn consolidate(
    records: &[EvidenceRecord],
    table: &DomainCredibilityTable,
) -> ConsolidatedEvidence {
    let mut kept: Vec<EvidenceRecord> = Vec::with_capacity(records.len());
    let mut seen_quotes: HashSet<String> = HashSet::new();
    let mut seen_urls: HashMap<String, usize> = HashMap::new();
    let mut removed = 0usize;

    for rec in records {
        let quote_key = normalize_quote(&rec.quote);
        if seen_quotes.contains(&quote_key) {
            removed += 1;
            continue;
        }

        let url_key = normalize_url(&rec.url);
        if let Some(&slot) = seen_urls.get(&url_key) {
            removed += 1;
            if prefer_candidate(rec, &kept[slot]) {
                // The old quote stays registered so a later repeat of it is
                // still dropped.
                seen_quotes.insert(quote_key);
                kept[slot] = rec.clone();
            }
            continue;
        }

        seen_quotes.insert(quote_key);
        seen_urls.insert(url_key, kept.len());
        kept.push(rec.clone());
    }

    for rec in &mut kept {
        rec.credibility = table.credibility_of(&rec.url);
    }

    let unique_domain_count = unique_domain_count(&kept);
    debug!(
        input = records.len(),
        kept = kept.len(),
        removed,
        unique_domains = unique_domain_count,
        "evidence consolidated"
    );

    ConsolidatedEvidence {
        records: kept,
        unique_domain_count,
        removed_count: removed,
    }
}

/// Distinct `www.`-stripped hosts; URLs without a host count as their literal text.
pub fn unique_domain_count(records: &[EvidenceRecord]) -> usize {
    records
        .iter()
        .map(|r| domain_key(&r.url))
        .collect::<HashSet<_>>()
        .len()
}
