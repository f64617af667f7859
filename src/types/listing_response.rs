use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Quote;

/// Wire shape of the provider's `listings/latest` response.
///
/// The provider keys records by asset id; `serde_json`'s
/// `preserve_order` feature keeps the map in the order the provider
/// returned it, which is the ranking order callers display.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    /// Asset records keyed by id, in provider ranking order.
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// One asset record inside a listing response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRecord {
    /// Provider-assigned asset identifier.
    pub id: u64,

    /// Display name.
    pub name: String,

    /// Short symbol code.
    pub symbol: String,

    /// Nested per-currency quote envelope.
    pub quote: QuoteEnvelope,
}

/// The per-currency quote container; only the USD conversion is requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteEnvelope {
    /// The USD quote figures.
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

/// Market figures for the USD conversion target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsdQuote {
    /// Last price in USD.
    pub price: f64,

    /// Signed 24-hour percent change.
    pub percent_change_24h: f64,

    /// Market capitalization in USD.
    pub market_cap: f64,

    /// 24-hour traded volume in USD.
    pub volume_24h: f64,
}

impl ListingResponse {
    /// Flatten the keyed records into quotes, provider order preserved.
    ///
    /// Any record that does not parse makes the whole body malformed;
    /// a half-parsed listing is worse than falling back.
    pub fn into_quotes(self) -> Result<Vec<Quote>> {
        self.data
            .into_iter()
            .map(|(key, value)| {
                let record: AssetRecord = serde_json::from_value(value).map_err(|err| {
                    Error::malformed_response(
                        format!("asset record {key} did not parse: {err}"),
                        Some(Box::new(err)),
                    )
                })?;
                Ok(Quote::from(record))
            })
            .collect()
    }
}

impl From<AssetRecord> for Quote {
    fn from(record: AssetRecord) -> Self {
        Quote {
            id: record.id,
            name: record.name,
            symbol: record.symbol,
            price: record.quote.usd.price,
            percent_change_24h: record.quote.usd.percent_change_24h,
            market_cap: record.quote.usd.market_cap,
            volume_24h: record.quote.usd.volume_24h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_parses_in_provider_order() {
        let body = json!({
            "data": {
                "1027": {
                    "id": 1027,
                    "name": "Ethereum",
                    "symbol": "ETH",
                    "quote": { "USD": {
                        "price": 3456.78,
                        "percent_change_24h": -1.23,
                        "market_cap": 415847562783.0,
                        "volume_24h": 12847562783.0
                    }}
                },
                "1": {
                    "id": 1,
                    "name": "Bitcoin",
                    "symbol": "BTC",
                    "quote": { "USD": {
                        "price": 97234.56,
                        "percent_change_24h": 2.45,
                        "market_cap": 1923847562783.0,
                        "volume_24h": 23847562783.0
                    }}
                }
            }
        });

        let listing: ListingResponse = serde_json::from_value(body).unwrap();
        let quotes = listing.into_quotes().unwrap();

        // Ethereum first: the provider's ordering wins, not the key's
        // numeric value.
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].symbol, "ETH");
        assert_eq!(quotes[1].symbol, "BTC");
        assert_eq!(quotes[1].price, 97234.56);
        assert_eq!(quotes[0].percent_change_24h, -1.23);
    }

    #[test]
    fn bad_record_is_malformed() {
        let body = json!({
            "data": {
                "1": { "id": 1, "name": "Bitcoin" }
            }
        });

        let listing: ListingResponse = serde_json::from_value(body).unwrap();
        let err = listing.into_quotes().unwrap_err();
        assert!(err.is_malformed_response());
    }
}
