use chrono::Utc;
use rand::Rng;
use url::Url;

use crate::debug::DebugChannel;
use crate::domain::root_domain;
use crate::error::{AttributionError, AttributionResult};

/// Upper bound (exclusive) of a resolution's random event id.
pub const EVENT_ID_BOUND: u32 = 1_000_000_000;

/// Everything observed about one page load.
///
/// Built once when the page loads and passed explicitly to the resolver,
/// memoizer and form bridge.
#[derive(Debug, Clone)]
pub struct PageLoad {
    url: Url,
    referrer: String,
    event_id: u32,
    timestamp: i64,
    debug: DebugChannel,
}

impl PageLoad {
    /// Observe a page load. Draws a fresh event id and reads the clock.
    pub fn new(page_url: &str, referrer: &str) -> AttributionResult<Self> {
        let url = Url::parse(page_url).map_err(|_| AttributionError::InvalidUrl {
            url: page_url.to_string(),
        })?;
        let debug = DebugChannel::from_fragment(url.fragment());
        Ok(Self {
            url,
            referrer: referrer.to_string(),
            event_id: rand::rng().random_range(0..EVENT_ID_BOUND),
            timestamp: Utc::now().timestamp(),
            debug,
        })
    }

    pub fn with_event_id(mut self, event_id: u32) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn with_timestamp(mut self, unix_seconds: i64) -> Self {
        self.timestamp = unix_seconds;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = DebugChannel::new(enabled);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw HTTP referrer, empty when there was none.
    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    pub fn event_id(&self) -> u32 {
        self.event_id
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn debug(&self) -> DebugChannel {
        self.debug
    }

    pub fn root_domain(&self) -> String {
        root_domain(self.url.host_str().unwrap_or_default())
    }

    /// Query string with its leading `?`, or empty when there is none.
    pub fn search(&self) -> String {
        match self.url.query() {
            Some(q) if !q.is_empty() => format!("?{q}"),
            _ => String::new(),
        }
    }

    /// Identifier minted for a first visit observed on this page load.
    pub fn visit_id(&self) -> String {
        format!("{}.{}", self.event_id, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_url() {
        assert!(matches!(
            PageLoad::new("/landing?x=1", ""),
            Err(AttributionError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn event_id_within_bounds() {
        for _ in 0..100 {
            let page = PageLoad::new("https://example.com/", "").unwrap();
            assert!(page.event_id() < EVENT_ID_BOUND);
        }
    }

    fn page(url: &str) -> PageLoad {
        PageLoad::new(url, "").unwrap()
    }

    #[test]
    fn search_includes_question_mark() {
        assert_eq!(
            page("https://www.example.com/p?a=1&b=2#frag").search(),
            "?a=1&b=2"
        );
        assert_eq!(page("https://www.example.com/p?").search(), "");
        assert_eq!(page("https://www.example.com/p").search(), "");
    }

    #[test]
    fn debug_fragment_turns_channel_on() {
        assert!(page("https://example.com/#debug").debug().enabled());
        assert!(!page("https://example.com/#debugger").debug().enabled());
        let forced = page("https://example.com/").with_debug(true);
        assert!(forced.debug().enabled());
    }

    #[test]
    fn visit_id_joins_event_and_time() {
        let page = PageLoad::new("https://shop.example.com/", "")
            .unwrap()
            .with_event_id(17)
            .with_timestamp(1_700_000_000);
        assert_eq!(page.visit_id(), "17.1700000000");
        assert_eq!(page.root_domain(), "example.com");
    }
}
