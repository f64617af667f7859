use biometrics::{Collector, Counter};

pub(crate) static QUOTES_FETCHES: Counter = Counter::new("zennfy.quotes.fetches");
pub(crate) static QUOTES_ROUTE_ATTEMPTS: Counter = Counter::new("zennfy.quotes.route_attempts");
pub(crate) static QUOTES_ROUTE_FAILURES: Counter = Counter::new("zennfy.quotes.route_failures");
pub(crate) static QUOTES_FALLBACKS: Counter = Counter::new("zennfy.quotes.fallbacks");
pub(crate) static QUOTES_STALE_COMMITS: Counter = Counter::new("zennfy.quotes.stale_commits");

pub(crate) static CHAT_REQUESTS: Counter = Counter::new("zennfy.chat.requests");
pub(crate) static CHAT_FALLBACKS: Counter = Counter::new("zennfy.chat.fallbacks");

pub(crate) static SESSION_TURNS: Counter = Counter::new("zennfy.session.turns");
pub(crate) static SESSION_REJECTED_SUBMITS: Counter =
    Counter::new("zennfy.session.rejected_submits");
pub(crate) static SESSION_REACTIONS: Counter = Counter::new("zennfy.session.reactions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&QUOTES_FETCHES);
    collector.register_counter(&QUOTES_ROUTE_ATTEMPTS);
    collector.register_counter(&QUOTES_ROUTE_FAILURES);
    collector.register_counter(&QUOTES_FALLBACKS);
    collector.register_counter(&QUOTES_STALE_COMMITS);

    collector.register_counter(&CHAT_REQUESTS);
    collector.register_counter(&CHAT_FALLBACKS);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_REJECTED_SUBMITS);
    collector.register_counter(&SESSION_REACTIONS);
}
