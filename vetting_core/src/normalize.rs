//! URL and quote normalization shared by dedup, credibility lookup and
//! domain-diversity counting.
//!
//! Nothing here fails: a URL that does not parse (or parses without a host)
//! degrades to its lower-cased literal text.

use url::Url;

/// Parse `raw` and return its host with a leading `www.` removed.
/// `None` when the URL does not parse or has no host.
pub fn host_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(strip_www(host).to_string())
}

/// Remove a single leading `www.` label.
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Canonical identity of a URL for dedup: scheme + host (no `www.`) + path
/// without trailing slashes, all lower-cased. Query, fragment, port and
/// credentials are dropped.
pub fn normalize_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return literal_url(raw);
    };
    let Some(host) = parsed
        .host_str()
        .map(|h| h.trim_end_matches('.'))
        .filter(|h| !h.is_empty())
    else {
        return literal_url(raw);
    };

    let host = host.to_ascii_lowercase();
    let path = parsed.path().to_lowercase();
    format!(
        "{}://{}{}",
        parsed.scheme(),
        strip_www(&host),
        path.trim_end_matches('/')
    )
}

fn literal_url(raw: &str) -> String {
    raw.to_lowercase().trim_end_matches('/').to_string()
}

/// Lower-case, collapse whitespace runs to single spaces, trim.
pub fn normalize_quote(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key used for domain-diversity counting: the `www.`-stripped host, or the
/// literal URL text when there is no host to extract.
pub fn domain_key(raw: &str) -> String {
    host_of(raw).unwrap_or_else(|| raw.to_string())
}
