use vetting_core::decide::{
    REASON_INSUFFICIENT_EVIDENCE, REASON_NO_DISTRIBUTION, REASON_SATURATED_MARKET,
    REASON_UNKNOWN_BUYER,
};
use vetting_core::*;

fn rec(url: &str, quote: &str, credibility: u8) -> EvidenceRecord {
    EvidenceRecord::new(url, quote).with_credibility(credibility)
}

fn distinct_sites(n: usize) -> Vec<EvidenceRecord> {
    (0..n)
        .map(|i| rec(&format!("https://site{i}.com/page"), &format!("quote number {i}"), 3))
        .collect()
}

// ---------------------------------------------------------------------
// Credibility
// ---------------------------------------------------------------------

#[test]
fn listicle_urls_are_tier_one() {
    assert_eq!(credibility_of("https://somesite.com/best-crm-tools"), 1);
    assert_eq!(credibility_of("https://somesite.com/top-10-tools"), 1);
    assert_eq!(credibility_of("https://somesite.com/blog/7-best-crms"), 1);
    assert_eq!(credibility_of("https://somesite.com/the-best-crm-software"), 1);
    assert_eq!(credibility_of("https://SOMESITE.com/Best-CRM-Tools"), 1);
}

#[test]
fn unknown_domain_gets_default_tier() {
    assert_eq!(credibility_of("https://random-blog.io/article"), 2);
}

#[test]
fn unparseable_url_gets_default_tier() {
    assert_eq!(credibility_of("not a url at all"), 2);
    assert_eq!(credibility_of(""), 2);
}

#[test]
fn known_domain_ignores_www_and_subdomains() {
    assert_eq!(credibility_of("https://g2.com/products/acme"), 5);
    assert_eq!(credibility_of("https://www.g2.com/products/acme"), 5);
    assert_eq!(credibility_of("https://old.g2.com/products/acme"), 5);
    assert_eq!(credibility_of("https://news.ycombinator.com/item?id=1"), 3);
}

#[test]
fn trailing_root_dot_on_host_is_ignored() {
    assert_eq!(credibility_of("https://g2.com./x"), 5);
    assert_eq!(credibility_of("https://www.g2.com./x"), 5);
    assert_eq!(credibility_of("https://old.g2.com./x"), 5);
    assert_eq!(
        vetting_core::normalize::normalize_url("https://G2.com./x/"),
        vetting_core::normalize::normalize_url("https://g2.com/x")
    );
}

#[test]
fn known_domain_wins_over_listicle_pattern() {
    assert_eq!(credibility_of("https://www.g2.com/categories/best-crm-software"), 5);
}

#[test]
fn injected_table_replaces_builtin() {
    let table = DomainCredibilityTable::new(3).with_tier("www.Example.org", 4);
    assert_eq!(table.credibility_of("https://docs.example.org/guide"), 4);
    assert_eq!(table.credibility_of("https://example.org"), 4);
    // No listicle patterns configured.
    assert_eq!(table.credibility_of("https://somesite.com/best-crm-tools"), 3);
    assert_eq!(table.credibility_of("::::"), 3);
    assert!(table.is_high_credibility("https://example.org/x"));
}

// ---------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------

#[test]
fn duplicate_quote_under_other_url_is_dropped() {
    let out = consolidate(
        &[
            rec("https://a.com/one", "Teams hate  manual invoicing", 3),
            rec("https://b.com/two", "teams hate manual invoicing ", 5),
        ],
        builtin_table(),
    );
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].url, "https://a.com/one");
    assert_eq!(out.removed_count, 1);
}

#[test]
fn same_url_keeps_higher_credibility() {
    let out = consolidate(
        &[
            rec("https://www.Example.com/path/", "first quote", 2),
            rec("https://example.com/path?ref=abc#top", "second", 4),
        ],
        builtin_table(),
    );
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].quote, "second");
    assert_eq!(out.removed_count, 1);
}

#[test]
fn same_url_equal_credibility_keeps_longer_quote() {
    let out = consolidate(
        &[
            rec("https://example.com/a", "short", 3),
            rec("https://example.com/a/", "a much longer quote", 3),
            rec("https://example.com/a", "tiny", 3),
        ],
        builtin_table(),
    );
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].quote, "a much longer quote");
    assert_eq!(out.removed_count, 2);
}

#[test]
fn lower_credibility_never_replaces_even_with_longer_quote() {
    let kept = rec("https://example.com/a", "short", 4);
    let candidate = rec("https://example.com/a", "a much longer quote", 2);
    assert!(!prefer_candidate(&candidate, &kept));
    assert!(prefer_candidate(&kept.clone().with_credibility(5), &kept));
    assert!(!prefer_candidate(&kept, &kept));
}

#[test]
fn replaced_quote_still_blocks_later_repeats() {
    let out = consolidate(
        &[
            rec("https://example.com/a", "original", 2),
            rec("https://example.com/a", "replacement", 5),
            rec("https://other.com/b", "Original", 3),
            rec("https://third.com/c", "replacement", 3),
        ],
        builtin_table(),
    );
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].quote, "replacement");
    assert_eq!(out.removed_count, 3);
}

#[test]
fn credibility_is_recomputed_from_table() {
    let out = consolidate(
        &[
            rec("https://random-blog.io/article", "claimed very credible", 5),
            rec("https://www.capterra.com/reviews/1", "claimed junk", 1),
            rec("https://somesite.com/top-10-tools", "listicle", 4),
        ],
        builtin_table(),
    );
    let tiers: Vec<u8> = out.records.iter().map(|r| r.credibility).collect();
    assert_eq!(tiers, vec![2, 5, 1]);
}

#[test]
fn unique_domains_strip_www_and_count_literals() {
    let out = consolidate(
        &[
            rec("https://www.g2.com/a", "one", 3),
            rec("https://g2.com/b", "two", 3),
            rec("not a url", "three", 3),
            rec("https://reddit.com/r/saas", "four", 3),
        ],
        builtin_table(),
    );
    assert_eq!(out.records.len(), 4);
    assert_eq!(out.unique_domain_count, 3);
    assert_eq!(out.removed_count, 0);
}

#[test]
fn unparseable_urls_dedup_on_literal_text() {
    let out = consolidate(
        &[rec("Not A URL/", "one", 3), rec("not a url", "two", 4)],
        builtin_table(),
    );
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].quote, "two");
    assert_eq!(out.records[0].credibility, 2);
}

#[test]
fn empty_input_consolidates_to_nothing() {
    let out = consolidate(&[], builtin_table());
    assert_eq!(out, ConsolidatedEvidence::default());
}

// ---------------------------------------------------------------------
// Evidence strength
// ---------------------------------------------------------------------

#[test]
fn empty_evidence_has_zero_strength() {
    assert_eq!(evidence_strength(&[], builtin_table()), 0);
}

#[test]
fn thin_evidence_clamps_at_zero() {
    let records = consolidate(&distinct_sites(3), builtin_table()).records;
    assert_eq!(evidence_strength(&records, builtin_table()), 0);
}

#[test]
fn diverse_evidence_gets_domain_bonus() {
    // base 12/6 = 2, +1 for domains.
    let records = consolidate(&distinct_sites(12), builtin_table()).records;
    assert_eq!(evidence_strength(&records, builtin_table()), 3);
}

#[test]
fn review_sources_add_a_point() {
    let mut raw = distinct_sites(12);
    raw.push(rec("https://www.g2.com/products/acme/reviews", "g2 says", 3));
    raw.push(rec("https://capterra.com/p/acme", "capterra says", 3));
    let records = consolidate(&raw, builtin_table()).records;
    // base 14/6 = 2, +1 domains, +1 review sources.
    assert_eq!(evidence_strength(&records, builtin_table()), 4);
}

#[test]
fn listicle_heavy_evidence_is_penalised() {
    let raw: Vec<EvidenceRecord> = (0..10)
        .map(|i| rec(&format!("https://site{i}.com/best-{i}-tools"), &format!("pick {i}"), 5))
        .collect();
    let records = consolidate(&raw, builtin_table()).records;
    assert!(records.iter().all(|r| r.credibility == 1));
    // base 1, +1 domains, -1 low credibility.
    assert_eq!(evidence_strength(&records, builtin_table()), 1);
}

#[test]
fn quantity_saturates_at_five() {
    let records = consolidate(&distinct_sites(90), builtin_table()).records;
    assert_eq!(evidence_strength(&records, builtin_table()), 5);
}

// ---------------------------------------------------------------------
// Rubric
// ---------------------------------------------------------------------

#[test]
fn external_scores_are_rounded_and_clamped() {
    assert_eq!(clamp_dimension(7.6), 5);
    assert_eq!(clamp_dimension(-2.0), 0);
    assert_eq!(clamp_dimension(f64::NAN), 0);
    assert_eq!(clamp_dimension(f64::INFINITY), 0);
    assert_eq!(clamp_dimension(2.5), 3);
    assert_eq!(clamp_dimension(2.4), 2);
}

#[test]
fn total_is_sum_of_dimensions() {
    let ext = ExternalScores {
        pain_intensity: 5.0,
        frequency: 4.0,
        buyer_clarity: 3.0,
        budget_signal: 2.0,
        switching_cost: 1.0,
        competition: 0.0,
        distribution_feasibility: 99.0,
    };
    let rubric = RubricScores::from_external(&ext, 4);
    assert_eq!(rubric.distribution_feasibility, 5);
    assert_eq!(rubric.total(), 5 + 4 + 3 + 2 + 1 + 0 + 5 + 4);
    assert_eq!(RubricScores::uniform(5).total(), 40);
    assert_eq!(RubricScores::default().total(), 0);
}

// ---------------------------------------------------------------------
// Kill rules
// ---------------------------------------------------------------------

fn rubric_with(f: impl FnOnce(&mut RubricScores)) -> RubricScores {
    let mut r = RubricScores::uniform(3);
    f(&mut r);
    r
}

#[test]
fn weak_evidence_forces_no_go() {
    let rubric = rubric_with(|r| r.evidence_strength = 1);
    let res = apply_kill_rules(&rubric, 1, 10, Decision::Go);
    assert_eq!(res.decision, Decision::NoGo);
    assert!(res.overridden);
    assert_eq!(res.reasons, vec![REASON_INSUFFICIENT_EVIDENCE.to_string()]);
}

#[test]
fn healthy_rubric_keeps_suggestion() {
    let rubric = RubricScores::uniform(3);
    let res = apply_kill_rules(&rubric, 0, 10, Decision::Go);
    assert_eq!(res.decision, Decision::Go);
    assert!(!res.overridden);
    assert!(res.reasons.is_empty());
}

#[test]
fn hard_failures_are_reported_together_in_order() {
    let rubric = rubric_with(|r| {
        r.evidence_strength = 0;
        r.distribution_feasibility = 1;
        r.competition = 0;
        r.buyer_clarity = 0;
    });
    let res = apply_kill_rules(&rubric, 0, 2, Decision::Go);
    assert_eq!(res.decision, Decision::NoGo);
    assert_eq!(
        res.reasons,
        vec![
            REASON_INSUFFICIENT_EVIDENCE.to_string(),
            REASON_NO_DISTRIBUTION.to_string(),
            REASON_SATURATED_MARKET.to_string(),
        ]
    );
}

#[test]
fn wedge_option_defuses_saturated_market() {
    let rubric = rubric_with(|r| r.competition = 1);
    assert_eq!(apply_kill_rules(&rubric, 1, 10, Decision::Go).decision, Decision::Go);

    let res = apply_kill_rules(&rubric, 0, 10, Decision::Go);
    assert_eq!(res.decision, Decision::NoGo);
    assert_eq!(res.reasons, vec![REASON_SATURATED_MARKET.to_string()]);
}

#[test]
fn suggested_no_go_is_not_an_override() {
    let rubric = rubric_with(|r| r.distribution_feasibility = 0);
    let res = apply_kill_rules(&rubric, 1, 10, Decision::NoGo);
    assert_eq!(res.decision, Decision::NoGo);
    assert!(!res.overridden);
    assert_eq!(res.reasons.len(), 1);
}

#[test]
fn hard_failure_outranks_unknown_buyer() {
    let rubric = rubric_with(|r| {
        r.evidence_strength = 1;
        r.buyer_clarity = 1;
    });
    let res = apply_kill_rules(&rubric, 1, 5, Decision::Unclear);
    assert_eq!(res.decision, Decision::NoGo);
    assert!(res.overridden);
    assert!(!res.reasons.iter().any(|r| r == REASON_UNKNOWN_BUYER));
}

#[test]
fn unknown_buyer_with_thin_evidence_is_unclear() {
    let rubric = rubric_with(|r| r.buyer_clarity = 1);

    let res = apply_kill_rules(&rubric, 1, 9, Decision::Go);
    assert_eq!(res.decision, Decision::Unclear);
    assert!(res.overridden);
    assert_eq!(res.reasons, vec![REASON_UNKNOWN_BUYER.to_string()]);

    let res = apply_kill_rules(&rubric, 1, 9, Decision::Unclear);
    assert_eq!(res.decision, Decision::Unclear);
    assert!(!res.overridden);

    let res = apply_kill_rules(&rubric, 1, 9, Decision::NoGo);
    assert_eq!(res.decision, Decision::Unclear);
    assert!(!res.overridden);
    assert_eq!(res.reasons, vec![REASON_UNKNOWN_BUYER.to_string()]);

    // Enough evidence: the buyer rule stays quiet.
    let res = apply_kill_rules(&rubric, 1, 10, Decision::Go);
    assert_eq!(res.decision, Decision::Go);
    assert!(!res.overridden);
}

#[test]
fn decision_wire_format() {
    assert_eq!(serde_json::to_string(&Decision::NoGo).unwrap(), "\"NO_GO\"");
    assert_eq!(serde_json::to_string(&Decision::Go).unwrap(), "\"GO\"");
    let d: Decision = serde_json::from_str("\"UNCLEAR\"").unwrap();
    assert_eq!(d, Decision::Unclear);
}

#[test]
fn lenient_decision_parsing() {
    assert_eq!(Decision::parse_lenient("GO"), Decision::Go);
    assert_eq!(Decision::parse_lenient(" go "), Decision::Go);
    assert_eq!(Decision::parse_lenient("No-Go"), Decision::NoGo);
    assert_eq!(Decision::parse_lenient("no go"), Decision::NoGo);
    assert_eq!(Decision::parse_lenient("NO_GO"), Decision::NoGo);
    assert_eq!(Decision::parse_lenient("unclear"), Decision::Unclear);
    assert_eq!(Decision::parse_lenient("definitely maybe"), Decision::Unclear);
    assert_eq!(Decision::parse_lenient(""), Decision::Unclear);
}

// ---------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------

#[test]
fn pipeline_scores_consolidated_evidence() {
    let mut raw = distinct_sites(12);
    raw.push(rec("https://site0.com/page/", "duplicate slot, shorter", 1));
    raw.push(rec("https://g2.com/p/a", "g2 review", 3));
    raw.push(rec("https://capterra.com/p/a", "capterra review", 3));

    let packet = decide(
        &raw,
        &ExternalScores::uniform(4.0),
        &[WedgeOption::default()],
        Decision::Go,
        builtin_table(),
    );

    assert_eq!(packet.removed_count, 1);
    assert_eq!(packet.consolidated_evidence.len(), 14);
    assert_eq!(packet.unique_domain_count, 14);
    assert_eq!(packet.rubric.scores.evidence_strength, 4);
    assert_eq!(packet.rubric.total, 4 * 7 + 4);
    assert_eq!(packet.rubric.decision, Decision::Go);
    assert!(!packet.rubric.overridden);
}

#[test]
fn pipeline_kills_idea_without_evidence() {
    let packet = decide(
        &[],
        &ExternalScores::uniform(5.0),
        &[],
        Decision::Go,
        builtin_table(),
    );
    assert_eq!(packet.rubric.scores.evidence_strength, 0);
    assert_eq!(packet.rubric.total, 35);
    assert_eq!(packet.rubric.decision, Decision::NoGo);
    assert!(packet.rubric.overridden);
    assert_eq!(
        packet.rubric.override_reasons,
        vec![REASON_INSUFFICIENT_EVIDENCE.to_string()]
    );

    let json = serde_json::to_value(&packet).unwrap();
    assert_eq!(json["rubric"]["decision"], "NO_GO");
    assert_eq!(json["rubric"]["scores"]["evidenceStrength"], 0);
    assert_eq!(json["uniqueDomainCount"], 0);
}

// ---------------------------------------------------------------------
// Usage and configuration
// ---------------------------------------------------------------------

#[test]
fn usage_counter_accumulates_and_merges() {
    let mut a = UsageCounter::default();
    a.record(ModelCall { input_tokens: 100, output_tokens: 20, cost_usd: 0.5 });
    a.record(ModelCall { input_tokens: 50, output_tokens: 5, cost_usd: f64::NAN });
    assert_eq!(a.calls, 2);
    assert_eq!(a.total_tokens(), 175);
    assert!((a.cost_usd - 0.5).abs() < 1e-9);

    let mut b = UsageCounter::default();
    b.record(ModelCall { input_tokens: 1, output_tokens: 1, cost_usd: 0.25 });
    b.merge(&a);
    assert_eq!(b.calls, 3);
    assert_eq!(b.input_tokens, 151);
    assert!((b.cost_usd - 0.75).abs() < 1e-9);
}

#[test]
fn credibility_table_from_toml() {
    let table = DomainCredibilityTable::from_toml_str(
        r#"
default_tier = 3
listicle_patterns = ["/ranked-"]

[tiers]
"example.org" = 5
"#,
    )
    .unwrap();
    assert_eq!(table.credibility_of("https://www.example.org/a"), 5);
    assert_eq!(table.credibility_of("https://blog.example.org/a"), 5);
    assert_eq!(table.credibility_of("https://somesite.com/Ranked-crms"), 1);
    assert_eq!(table.credibility_of("https://somesite.com/best-crm-tools"), 3);
    assert_eq!(table.credibility_of("https://g2.com/a"), 3);
}

#[test]
fn empty_toml_yields_builtin_behaviour() {
    let table = DomainCredibilityTable::from_toml_str("").unwrap();
    for url in [
        "https://g2.com/a",
        "https://somesite.com/top-10-tools",
        "https://random-blog.io/article",
    ] {
        assert_eq!(table.credibility_of(url), credibility_of(url));
    }
    assert_eq!(CredibilityCfg::default().build().unwrap().len(), builtin_table().len());
}

#[test]
fn bad_config_is_rejected() {
    let err = DomainCredibilityTable::from_toml_str(r#"listicle_patterns = ["(unclosed"]"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));

    let err = DomainCredibilityTable::from_toml_str("[tiers]\n\"x.com\" = 7\n").unwrap_err();
    assert!(matches!(err, ConfigError::TierOutOfRange { tier: 7, .. }));

    let err = DomainCredibilityTable::from_toml_str("default_tier = 0").unwrap_err();
    assert!(matches!(err, ConfigError::TierOutOfRange { tier: 0, .. }));

    let err = DomainCredibilityTable::from_toml_str("default_tier = [").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}
