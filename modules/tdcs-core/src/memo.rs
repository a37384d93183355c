//! Session memoization of the attribution record.
//!
//! The first page view of a session resolves and stores the record; every
//! later page view decodes the stored copy and returns it untouched.

use crate::debug::DebugChannel;
use crate::envelope;
use crate::identity::DurableIdentity;
use crate::page::PageLoad;
use crate::page_debug;
use crate::record::AttributionRecord;
use crate::resolver::{Resolution, Resolver};
use crate::storage::{
    read_or_absent, write_best_effort, DurableStore, SessionStore, ANALYTICS_COOKIE, SESSION_KEY,
};

/// A record and whether it came from session storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memoized {
    pub record: AttributionRecord,
    pub reused: bool,
}

pub struct SessionMemo<'a, S: SessionStore + ?Sized> {
    store: &'a mut S,
    key: &'a str,
    debug: DebugChannel,
}

impl<'a, S: SessionStore + ?Sized> SessionMemo<'a, S> {
    pub fn new(store: &'a mut S, debug: DebugChannel) -> Self {
        Self {
            store,
            key: SESSION_KEY,
            debug,
        }
    }

    /// Use a storage key other than `tdcs`.
    pub fn key(mut self, key: &'a str) -> Self {
        self.key = key;
        self
    }

    /// Return the stored record, or compute, store and return a new one.
    ///
    /// A stored payload that does not decode is treated as absent and
    /// overwritten.
    pub fn get_or<F>(mut self, f: F) -> Memoized
    where
        F: FnOnce() -> AttributionRecord,
    {
        if let Some(payload) = read_or_absent(self.store.get_item(self.key), self.key, self.debug) {
            match envelope::decode(&payload) {
                Ok(decoded) => {
                    page_debug!(self.debug, version = decoded.version, "reusing session record");
                    return Memoized {
                        record: decoded.record,
                        reused: true,
                    };
                }
                Err(e) => page_debug!(self.debug, error = %e, "unreadable session record"),
            }
        }

        let record = f();
        match envelope::encode(&record) {
            Ok(payload) => write_best_effort(
                self.store.set_item(self.key, &payload),
                self.key,
                self.debug,
            ),
            Err(e) => page_debug!(self.debug, error = %e, "could not encode session record"),
        }
        Memoized {
            record,
            reused: false,
        }
    }
}

/// Assemble the full record for a fresh resolution.
pub fn assemble_record(
    page: &PageLoad,
    resolution: Resolution,
    identity: &DurableIdentity,
    analytics_session: Option<String>,
) -> AttributionRecord {
    AttributionRecord {
        landing_page: page.url().to_string(),
        utm_source: resolution.utm_source,
        utm_medium: resolution.utm_medium,
        utm_campaign: resolution.utm_campaign,
        utm_term: resolution.utm_term,
        utm_content: resolution.utm_content,
        utm_adgroup: resolution.utm_adgroup,
        utm_keyword: resolution.utm_keyword,
        click_id: resolution.click_id,
        query_params: page.search(),
        session_referrer: page.referrer().to_string(),
        is_first_visit: identity.is_first_visit,
        event_id: page.event_id(),
        initial_visit_id: identity.id.clone(),
        third_party_session_id: analytics_session,
    }
}

/// Reuse the session's record, or resolve this page load into a new one.
pub fn resolve_or_reuse<D, S>(
    resolver: &Resolver,
    page: &PageLoad,
    identity: &DurableIdentity,
    durable: &D,
    session: &mut S,
) -> Memoized
where
    D: DurableStore + ?Sized,
    S: SessionStore + ?Sized,
{
    SessionMemo::new(session, page.debug()).get_or(|| {
        let resolution = resolver.resolve(page);
        let analytics = read_or_absent(
            durable.get(ANALYTICS_COOKIE),
            ANALYTICS_COOKIE,
            page.debug(),
        );
        assemble_record(page, resolution, identity, analytics)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStore;
    use crate::testing::UnavailableStore;

    fn record(source: &str) -> AttributionRecord {
        AttributionRecord {
            utm_source: Some(source.to_string()),
            event_id: 11,
            ..Default::default()
        }
    }

    #[test]
    fn miss_computes_and_stores() {
        let mut store = MemorySessionStore::new();
        let memo = SessionMemo::new(&mut store, DebugChannel::default()).get_or(|| record("a"));
        assert!(!memo.reused);
        let stored = store.get_item(SESSION_KEY).unwrap().unwrap();
        assert_eq!(envelope::decode(&stored).unwrap().record, record("a"));
    }

    #[test]
    fn hit_skips_computation() {
        let mut store = MemorySessionStore::new();
        SessionMemo::new(&mut store, DebugChannel::default()).get_or(|| record("a"));
        let memo = SessionMemo::new(&mut store, DebugChannel::default())
            .get_or(|| panic!("must not recompute"));
        assert!(memo.reused);
        assert_eq!(memo.record, record("a"));
    }

    #[test]
    fn unreadable_payload_is_replaced() {
        let mut store = MemorySessionStore::new();
        store.set_item(SESSION_KEY, "!!garbage!!").unwrap();
        let memo = SessionMemo::new(&mut store, DebugChannel::new(true)).get_or(|| record("b"));
        assert!(!memo.reused);
        let stored = store.get_item(SESSION_KEY).unwrap().unwrap();
        let decoded = envelope::decode(&stored).unwrap();
        assert_eq!(decoded.record.utm_source.as_deref(), Some("b"));
    }

    #[test]
    fn custom_key() {
        let mut store = MemorySessionStore::new();
        SessionMemo::new(&mut store, DebugChannel::default())
            .key("other")
            .get_or(|| record("c"));
        assert!(store.get_item("other").unwrap().is_some());
        assert!(store.get_item(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn unavailable_session_store_still_resolves() {
        let mut store = UnavailableStore;
        let memo = SessionMemo::new(&mut store, DebugChannel::new(true)).get_or(|| record("d"));
        assert!(!memo.reused);
        assert_eq!(memo.record.utm_source.as_deref(), Some("d"));
    }
}
