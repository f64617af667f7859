//! Resilient market-quote retrieval.
//!
//! The quotes provider is not reachable from every deployment context
//! directly, so the fetch walks an ordered list of network routes: the
//! provider itself first, then public relay intermediaries wrapping
//! the same logical request. Routes are tried strictly sequentially,
//! each once, and the first success short-circuits the rest; trying
//! them concurrently would waste requests against possibly
//! rate-limited intermediaries once one path succeeds. When no route
//! succeeds, or no credential is configured, the fetch serves a fixed
//! sample list so the caller never renders empty.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as ReqwestClient;
use url::Url;

use crate::credentials::{Credential, CredentialStore};
use crate::error::{Error, Result};
use crate::observability::{
    QUOTES_FALLBACKS, QUOTES_FETCHES, QUOTES_ROUTE_ATTEMPTS, QUOTES_ROUTE_FAILURES,
    QUOTES_STALE_COMMITS,
};
use crate::types::{ListingResponse, MarketSnapshot, Quote};

const DEFAULT_QUOTES_API_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
const QUOTES_API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LIMIT: u32 = 10;

/// One way of reaching the quotes provider.
///
/// A route wraps the same logical listing request through a different
/// network path. Implementations are tried in order by
/// [`QuotesClient::fetch_top_quotes`]; each is attempted once per
/// fetch cycle.
#[async_trait::async_trait]
pub trait FetchRoute: Send + Sync {
    /// A short name for logs and debugging.
    fn name(&self) -> &str;

    /// Issue the listing request over this path.
    async fn fetch(&self, http: &ReqwestClient, api_key: &str, limit: u32) -> Result<Vec<Quote>>;
}

/// Builds the logical listing URL: start offset, result limit, and
/// USD as the conversion target.
fn listing_url(base_url: &str, limit: u32) -> Result<Url> {
    Url::parse_with_params(
        base_url,
        &[
            ("start", "1".to_string()),
            ("limit", limit.to_string()),
            ("convert", "USD".to_string()),
        ],
    )
    .map_err(|err| {
        Error::malformed_response(format!("bad listing URL: {err}"), Some(Box::new(err)))
    })
}

async fn fetch_listing(
    http: &ReqwestClient,
    url: Url,
    api_key: &str,
) -> Result<Vec<Quote>> {
    let response = http
        .get(url)
        .header(QUOTES_API_KEY_HEADER, api_key)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(Error::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::http(
            status.as_u16(),
            format!("quotes endpoint returned {status}"),
        ));
    }

    let listing: ListingResponse = response.json().await.map_err(|err| {
        Error::malformed_response(
            format!("listing body did not parse: {err}"),
            Some(Box::new(err)),
        )
    })?;
    listing.into_quotes()
}

/// The provider endpoint, reached directly.
pub struct DirectRoute {
    base_url: String,
}

impl DirectRoute {
    /// Create a direct route against the given listing endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl FetchRoute for DirectRoute {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch(&self, http: &ReqwestClient, api_key: &str, limit: u32) -> Result<Vec<Quote>> {
        let url = listing_url(&self.base_url, limit)?;
        fetch_listing(http, url, api_key).await
    }
}

/// A public CORS-relay intermediary wrapping the direct request.
///
/// The relay expects the full target URL appended to its prefix; the
/// provider's API-key header rides along unchanged.
pub struct RelayRoute {
    name: String,
    prefix: String,
    base_url: String,
}

impl RelayRoute {
    /// Create a relay route with the given URL prefix.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl FetchRoute for RelayRoute {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, http: &ReqwestClient, api_key: &str, limit: u32) -> Result<Vec<Quote>> {
        let inner = listing_url(&self.base_url, limit)?;
        let wrapped = Url::parse(&format!("{}{}", self.prefix, inner)).map_err(|err| {
            Error::malformed_response(format!("bad relay URL: {err}"), Some(Box::new(err)))
        })?;
        fetch_listing(http, wrapped, api_key).await
    }
}

/// The default route chain: the provider first, then relays.
pub fn default_routes(base_url: &str) -> Vec<Box<dyn FetchRoute>> {
    vec![
        Box::new(DirectRoute::new(base_url)),
        Box::new(RelayRoute::new(
            "corsproxy",
            "https://corsproxy.io/?",
            base_url,
        )),
        Box::new(RelayRoute::new(
            "allorigins",
            "https://api.allorigins.win/raw?url=",
            base_url,
        )),
    ]
}

/// The fixed sample list served when no live data is available.
///
/// Five well-known assets with plausible figures; ids 1 through 5.
pub fn sample_quotes() -> Vec<Quote> {
    vec![
        Quote::new(1, "Bitcoin", "BTC", 97234.56, 2.45, 1_923_847_562_783.0, 23_847_562_783.0),
        Quote::new(2, "Ethereum", "ETH", 3456.78, -1.23, 415_847_562_783.0, 12_847_562_783.0),
        Quote::new(3, "Solana", "SOL", 234.56, 5.67, 110_847_562_783.0, 3_847_562_783.0),
        Quote::new(4, "Cardano", "ADA", 0.89, 3.21, 31_847_562_783.0, 1_847_562_783.0),
        Quote::new(5, "Polygon", "MATIC", 1.23, -2.45, 12_847_562_783.0, 947_562_783.0),
    ]
}

/// Client for the ranked asset-quote listing.
pub struct QuotesClient {
    store: Arc<dyn CredentialStore>,
    http: ReqwestClient,
    routes: Vec<Box<dyn FetchRoute>>,
    limit: u32,
}

impl QuotesClient {
    /// Create a new quotes client with default routes and limit.
    pub fn new(store: Arc<dyn CredentialStore>) -> Result<Self> {
        Self::with_options(store, None, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        store: Arc<dyn CredentialStore>,
        base_url: Option<String>,
        timeout: Option<Duration>,
        limit: Option<u32>,
    ) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_QUOTES_API_URL.to_string());
        let http = ReqwestClient::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| {
                Error::network(format!("failed to build HTTP client: {}", e), Some(Box::new(e)))
            })?;
        Ok(Self {
            store,
            http,
            routes: default_routes(&base_url),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        })
    }

    /// Create a client with an explicit route chain. Used by tests to
    /// inject fake routes.
    pub fn with_routes(
        store: Arc<dyn CredentialStore>,
        routes: Vec<Box<dyn FetchRoute>>,
        limit: u32,
    ) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::network(format!("failed to build HTTP client: {}", e), Some(Box::new(e)))
            })?;
        Ok(Self {
            store,
            http,
            routes,
            limit,
        })
    }

    /// Fetch the current top-N asset quotes.
    ///
    /// Never errors. With no credential configured the fixed sample
    /// list is returned as a designed fallback. With a credential,
    /// each route is tried once in order; the first success wins. If
    /// every route fails the sample list is returned flagged
    /// `Degraded` so the caller can show a subdued warning.
    pub async fn fetch_top_quotes(&self) -> MarketSnapshot {
        QUOTES_FETCHES.click();

        let Some(api_key) = self.store.get(Credential::QuotesKey) else {
            return MarketSnapshot::sample(sample_quotes());
        };

        for route in &self.routes {
            QUOTES_ROUTE_ATTEMPTS.click();
            match route.fetch(&self.http, &api_key, self.limit).await {
                Ok(mut quotes) => {
                    // Relays are not trusted to honor the limit query.
                    quotes.truncate(self.limit as usize);
                    return MarketSnapshot::live(quotes);
                }
                Err(_) => QUOTES_ROUTE_FAILURES.click(),
            }
        }

        QUOTES_FALLBACKS.click();
        MarketSnapshot::degraded(sample_quotes())
    }
}

/// A ticket identifying one fetch cycle.
///
/// Tickets are ordered by issue time; a later ticket always beats an
/// earlier one at commit.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Holds the most recent snapshot and guards against stale overwrites.
///
/// Periodic refreshes are never cancelled, so a 5-minute tick can fire
/// while an earlier fetch is still in flight. Each cycle takes a
/// ticket from [`QuoteFeed::begin`] before fetching and commits with
/// it afterwards; a commit whose ticket is older than the last applied
/// one is dropped.
#[derive(Default)]
pub struct QuoteFeed {
    next_ticket: u64,
    committed: u64,
    latest: Option<MarketSnapshot>,
}

impl QuoteFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch cycle.
    pub fn begin(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }

    /// Apply a cycle's snapshot, unless a newer cycle already committed.
    ///
    /// Returns whether the snapshot was applied.
    pub fn commit(&mut self, ticket: FetchTicket, snapshot: MarketSnapshot) -> bool {
        if ticket.0 > self.committed {
            self.committed = ticket.0;
            self.latest = Some(snapshot);
            true
        } else {
            QUOTES_STALE_COMMITS.click();
            false
        }
    }

    /// The most recently committed snapshot, if any.
    pub fn latest(&self) -> Option<&MarketSnapshot> {
        self.latest.as_ref()
    }
}
