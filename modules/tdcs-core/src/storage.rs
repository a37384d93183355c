//! Storage boundary: the durable (cookie) store and the session store.
//!
//! Backends report failures through [`StorageResult`], but the engine only
//! ever goes through [`read_or_absent`] and [`write_best_effort`]: a failed
//! read is an absent entry and a failed write is dropped. Attribution must
//! never break the page it runs on.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::debug::DebugChannel;
use crate::error::StorageResult;
use crate::page_debug;

/// Durable cookie holding the visitor's first-visit identifier.
pub const INITIAL_VISIT_COOKIE: &str = "initialVisitId";
/// Session storage key holding the encoded attribution record.
pub const SESSION_KEY: &str = "tdcs";
/// Analytics session cookie copied into the record.
pub const ANALYTICS_COOKIE: &str = "_ga";
/// Lifetime of the first-visit cookie, in days.
pub const INITIAL_VISIT_LIFETIME_DAYS: i64 = 730;

/// Long-lived key-value store scoped to a domain (browser cookies).
pub trait DurableStore {
    fn get(&self, name: &str) -> StorageResult<Option<String>>;

    /// Store `value` for `lifetime`, scoped to `domain`. A zero lifetime
    /// means a session cookie; an empty domain means the current host.
    fn set(
        &mut self,
        name: &str,
        value: &str,
        lifetime: Duration,
        domain: &str,
    ) -> StorageResult<()>;
}

/// Key-value store that lives as long as the browsing session.
pub trait SessionStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Read through a fallible backend, treating failures and empty values as absent.
pub fn read_or_absent(
    read: StorageResult<Option<String>>,
    key: &str,
    debug: DebugChannel,
) -> Option<String> {
    match read {
        Ok(Some(value)) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(e) => {
            page_debug!(debug, key, error = %e, "storage read failed, treating as absent");
            None
        }
    }
}

/// Fire-and-forget write. Failures are logged to the debug channel and dropped.
pub fn write_best_effort(write: StorageResult<()>, key: &str, debug: DebugChannel) {
    match write {
        Ok(()) => page_debug!(debug, key, "storage write"),
        Err(e) => page_debug!(debug, key, error = %e, "storage write failed, ignored"),
    }
}

// ---------------------------------------------------------------------------
// CookieJar
// ---------------------------------------------------------------------------

/// Durable store backed by a `Cookie:` header, recording `Set-Cookie` lines
/// for every write.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
    set_cookies: Vec<String>,
    now: Option<DateTime<Utc>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie:` header value such as `a=1; b=2`.
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .map(|c| c.trim_start_matches(' '))
            .filter_map(|c| c.split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self {
            cookies,
            ..Self::default()
        }
    }

    /// Pin the clock used to compute `expires`.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// `Set-Cookie` lines produced by writes, oldest first.
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.set_cookies
    }
}

impl DurableStore for CookieJar {
    fn get(&self, name: &str) -> StorageResult<Option<String>> {
        Ok(self
            .cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    fn set(
        &mut self,
        name: &str,
        value: &str,
        lifetime: Duration,
        domain: &str,
    ) -> StorageResult<()> {
        let mut line = format!("{name}={value}");
        if lifetime > Duration::zero() {
            let expires = self.now.unwrap_or_else(Utc::now) + lifetime;
            line.push_str(&format!(
                "; expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        if !domain.is_empty() {
            line.push_str(&format!("; domain={domain}"));
        }
        line.push_str("; path=/;");
        self.set_cookies.push(line);

        match self.cookies.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.cookies.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    items: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
