use crate::config::TrackerConfig;
use crate::identity::{ensure_identity, DurableIdentity};
use crate::memo::resolve_or_reuse;
use crate::page::PageLoad;
use crate::page_debug;
use crate::record::AttributionRecord;
use crate::resolver::Resolver;
use crate::storage::{DurableStore, SessionStore};

/// The outcome of tracking one page load. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    record: AttributionRecord,
    identity: DurableIdentity,
    reused: bool,
}

impl Attribution {
    pub fn record(&self) -> &AttributionRecord {
        &self.record
    }

    pub fn identity(&self) -> &DurableIdentity {
        &self.identity
    }

    /// The record was read back from session storage rather than resolved.
    pub fn reused(&self) -> bool {
        self.reused
    }

    pub fn into_record(self) -> AttributionRecord {
        self.record
    }
}

/// Runs attribution for page loads against a fixed configuration.
#[derive(Debug, Clone)]
pub struct Tracker {
    resolver: Resolver,
}

impl Tracker {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            resolver: config.resolver(),
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Track a page load.
    ///
    /// The durable identity is read before the session record is resolved so
    /// a fresh record reflects whether this is a first visit; the identity is
    /// persisted whether or not the session already had a record.
    pub fn run<D, S>(&self, page: &PageLoad, durable: &mut D, session: &mut S) -> Attribution
    where
        D: DurableStore + ?Sized,
        S: SessionStore + ?Sized,
    {
        page_debug!(
            page.debug(),
            url = %page.url(),
            root = %page.root_domain(),
            "tracking page load"
        );

        let identity = ensure_identity(durable, page);
        let memo = resolve_or_reuse(&self.resolver, page, &identity, durable, session);

        Attribution {
            record: memo.record,
            identity,
            reused: memo.reused,
        }
    }
}
