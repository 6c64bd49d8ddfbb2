use serde::{Deserialize, Serialize};

/// Stance of a quote towards the opportunity being vetted.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Mixed,
}

/// One observed fact supporting or refuting the opportunity.
///
/// `credibility` is advisory on the way in: the consolidator overwrites it
/// with the tier from the credibility table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub url: String,
    pub quote: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub source_type: String,
    #[serde(default = "default_credibility")]
    pub credibility: u8,
}

fn default_credibility() -> u8 {
    crate::credibility::DEFAULT_TIER
}

impl EvidenceRecord {
    pub fn new(url: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quote: quote.into(),
            theme: String::new(),
            sentiment: Sentiment::Neutral,
            source_type: String::new(),
            credibility: default_credibility(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    pub fn with_credibility(mut self, credibility: u8) -> Self {
        self.credibility = credibility;
        self
    }
}

/// Opaque differentiation strategy proposed upstream. Only the count of these
/// ever reaches the kill rules.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WedgeOption {
    #[serde(default)]
    pub wedge: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub mvp: String,
}
