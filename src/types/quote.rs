use serde::{Deserialize, Serialize};

/// A snapshot of one tradable asset's market figures at fetch time.
///
/// Quotes are constructed fresh on each successful fetch cycle and
/// never mutated; the next cycle supersedes them wholesale. The id
/// echoes the provider's asset id and carries no identity across
/// fetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Provider-assigned asset identifier.
    pub id: u64,

    /// Display name (e.g., `Bitcoin`).
    pub name: String,

    /// Short symbol code (e.g., `BTC`).
    pub symbol: String,

    /// Last price in USD.
    pub price: f64,

    /// Signed 24-hour percent change.
    pub percent_change_24h: f64,

    /// Market capitalization in USD.
    pub market_cap: f64,

    /// 24-hour traded volume in USD.
    pub volume_24h: f64,
}

impl Quote {
    /// Create a new `Quote` with the given fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        name: impl Into<String>,
        symbol: impl Into<String>,
        price: f64,
        percent_change_24h: f64,
        market_cap: f64,
        volume_24h: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: symbol.into(),
            price,
            percent_change_24h,
            market_cap,
            volume_24h,
        }
    }

    /// Format the price as a two-decimal USD amount.
    pub fn price_display(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Format the market cap with T/B/M scaling.
    pub fn market_cap_display(&self) -> String {
        format_market_cap(self.market_cap)
    }
}

/// Format a USD amount with T/B/M scaling for compact display.
pub fn format_market_cap(market_cap: f64) -> String {
    if market_cap >= 1e12 {
        format!("${:.2}T", market_cap / 1e12)
    } else if market_cap >= 1e9 {
        format!("${:.2}B", market_cap / 1e9)
    } else if market_cap >= 1e6 {
        format!("${:.2}M", market_cap / 1e6)
    } else {
        format!("${:.2}", market_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_display_rounds_to_cents() {
        let quote = Quote::new(1, "Bitcoin", "BTC", 97234.556, 2.45, 1.9e12, 2.3e10);
        assert_eq!(quote.price_display(), "$97234.56");
    }

    #[test]
    fn market_cap_scaling() {
        assert_eq!(format_market_cap(1_923_847_562_783.0), "$1.92T");
        assert_eq!(format_market_cap(415_847_562_783.0), "$415.85B");
        assert_eq!(format_market_cap(12_847_562.0), "$12.85M");
        assert_eq!(format_market_cap(999.5), "$999.50");
    }
}
