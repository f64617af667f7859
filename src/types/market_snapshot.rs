use serde::{Deserialize, Serialize};

use crate::types::Quote;

/// Where a snapshot's quotes came from.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    /// Quotes fetched live from the provider.
    Live,

    /// The built-in sample list; no credential was configured.
    Sample,

    /// The built-in sample list served because every route failed.
    Degraded,
}

/// The result of one quote fetch cycle.
///
/// A snapshot always carries quotes; the source tag tells the
/// presentation layer whether to show a subdued demo-data warning
/// instead of blocking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketSnapshot {
    /// Ranked quotes, provider order preserved.
    pub quotes: Vec<Quote>,

    /// Provenance of the quotes.
    pub source: SnapshotSource,
}

impl MarketSnapshot {
    /// Create a snapshot of live provider data.
    pub fn live(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            source: SnapshotSource::Live,
        }
    }

    /// Create a sample snapshot (no credential configured).
    pub fn sample(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            source: SnapshotSource::Sample,
        }
    }

    /// Create a degraded snapshot (all routes failed).
    pub fn degraded(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            source: SnapshotSource::Degraded,
        }
    }

    /// Returns true if the snapshot came from the live provider.
    pub fn is_live(&self) -> bool {
        self.source == SnapshotSource::Live
    }

    /// Returns true if the snapshot was assembled after total fetch failure.
    pub fn is_degraded(&self) -> bool {
        self.source == SnapshotSource::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_flags() {
        assert!(MarketSnapshot::live(vec![]).is_live());
        assert!(!MarketSnapshot::live(vec![]).is_degraded());
        assert!(MarketSnapshot::degraded(vec![]).is_degraded());
        assert!(!MarketSnapshot::sample(vec![]).is_degraded());
        assert!(!MarketSnapshot::sample(vec![]).is_live());
    }

    #[test]
    fn source_serializes_snake_case() {
        let json = serde_json::to_value(SnapshotSource::Degraded).unwrap();
        assert_eq!(json, serde_json::json!("degraded"));
    }
}
