//! First-visit identity carried across sessions in a durable cookie.

use chrono::Duration;

use crate::page::PageLoad;
use crate::page_debug;
use crate::storage::{
    read_or_absent, write_best_effort, DurableStore, INITIAL_VISIT_COOKIE,
    INITIAL_VISIT_LIFETIME_DAYS,
};

/// The visitor's long-lived identifier as seen by this page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurableIdentity {
    /// `<event_id>.<unix seconds>` of the first recorded visit.
    pub id: String,
    /// No identifier existed before this page load.
    pub is_first_visit: bool,
}

/// Read the identifier without writing anything. A missing cookie yields the
/// id this page load would mint.
pub fn read_identity<D: DurableStore + ?Sized>(durable: &D, page: &PageLoad) -> DurableIdentity {
    match read_or_absent(
        durable.get(INITIAL_VISIT_COOKIE),
        INITIAL_VISIT_COOKIE,
        page.debug(),
    ) {
        Some(id) => DurableIdentity {
            id,
            is_first_visit: false,
        },
        None => DurableIdentity {
            id: page.visit_id(),
            is_first_visit: true,
        },
    }
}

/// Read the identifier, minting and persisting one for the page's root domain
/// when none exists. The write is best-effort and happens at most once per
/// cookie lifetime.
pub fn ensure_identity<D: DurableStore + ?Sized>(
    durable: &mut D,
    page: &PageLoad,
) -> DurableIdentity {
    let identity = read_identity(durable, page);
    page_debug!(page.debug(), is_first_visit = identity.is_first_visit, "durable identity");

    if identity.is_first_visit {
        write_best_effort(
            durable.set(
                INITIAL_VISIT_COOKIE,
                &identity.id,
                Duration::days(INITIAL_VISIT_LIFETIME_DAYS),
                &page.root_domain(),
            ),
            INITIAL_VISIT_COOKIE,
            page.debug(),
        );
    }
    identity
}
