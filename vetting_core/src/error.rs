/// Errors raised while building a credibility table from configuration.
///
/// Decision operations never fail; only configuration loading does.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse credibility config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid listicle pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("tier {tier} for `{domain}` is outside 1..=5")]
    TierOutOfRange { domain: String, tier: u8 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
