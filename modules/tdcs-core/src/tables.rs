//! Reference tables: search engines, social networks and paid click identifiers.
//!
//! All three are ordered lists. The resolver walks them front to back and the
//! first match wins, so more specific search-engine tokens sit ahead of
//! broader ones.

use serde::{Deserialize, Serialize};

use crate::domain::is_domain_or_subdomain;

/// One `(token, name)` row of a reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableEntry {
    pub token: String,
    pub name: String,
}

impl TableEntry {
    pub fn new(token: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            name: name.into(),
        }
    }
}

/// Matched by substring containment in the raw referrer URL.
const SEARCH_ENGINES: &[(&str, &str)] = &[
    ("www.google", "google"),
    (".google.co", "google"),
    ("www.bing", "bing"),
    (".bing.com", "bing"),
    ("www.yahoo", "yahoo"),
    ("search.yahoo", "yahoo"),
    ("yahoo.cn", "yahoo"),
    ("www.yandex", "yandex"),
    ("yandex.ru", "yandex"),
    ("ya.ru", "yandex"),
    ("yandex.com", "yandex"),
    ("www.ecosia.org", "ecosia"),
    ("duckduckgo.com", "duckduckgo"),
    ("android.googlequicksearchbox", "google"),
    ("baidu.com", "baidu"),
    ("search.aol.com", "aol"),
    ("www.ask.com", "ask"),
    ("search.brave.com", "brave"),
    ("www.startpage.com", "startpage"),
    ("www.qwant.com", "qwant"),
    ("searx.me", "searx"),
    ("www.dogpile.com", "dogpile"),
    ("www.wolframalpha.com", "wolframalpha"),
    ("www.archive.org", "internetarchive"),
    ("go.mail.ru", "mailru"),
    ("www.naver.com", "naver"),
    ("www.daum.net", "daum"),
    ("www.seznam.cz", "seznam"),
    ("www.rediff.com", "rediff"),
    ("search.sify.com", "sify"),
    ("www.indiatimes.com", "indiatimes"),
    ("www.khoj.com", "khoj"),
    ("www.bhanvad.com", "bhanvad"),
    ("www.guruji.com", "guruji"),
    ("www.123musiq.com", "123musiq"),
];

/// Matched against the referrer hostname, exact or subdomain.
const SOCIAL_NETWORKS: &[(&str, &str)] = &[
    ("linkedin.com", "linkedin"),
    ("com.linkedin.android", "linkedin"),
    ("facebook.com", "facebook"),
    ("twitter.com", "twitter"),
    ("x.com", "x"),
    ("instagram.com", "instagram"),
    ("pinterest.com", "pinterest"),
    ("reddit.com", "reddit"),
    ("t.co", "twitter"),
    ("lnkd.in", "linkedin"),
    ("fb.me", "facebook"),
    ("bit.ly", "bitly"),
    ("youtu.be", "youtube"),
    ("youtube.com", "youtube"),
    ("tumblr.com", "tumblr"),
    ("tiktok.com", "tiktok"),
    ("medium.com", "medium"),
    ("quora.com", "quora"),
];

/// Matched by exact, case-sensitive query parameter name on the page URL.
const CLICK_IDS: &[(&str, &str)] = &[
    ("msclkid", "bing"),
    ("fbclid", "facebook"),
    ("yclid", "yahoo"),
    ("gclid", "google"),
    ("cq_gclid", "google"),
    ("dclid", "google"),
    ("twclid", "twitter"),
    ("li_fat_id", "linkedin"),
    ("ttclid", "tiktok"),
    ("pt_id", "pinterest"),
    ("wbraid", "google"),
    ("gbraid", "google"),
    ("igshid", "instagram"),
    ("mc_eid", "mailchimp"),
    ("hsa_cam", "hubspot"),
    ("ad_id", "snapchat"),
    ("rtd_id", "reddit"),
    ("vero_id", "vero"),
    ("otm_campaign", "outbrain"),
    ("cid", "adobe"),
    ("s_cid", "adobe"),
    ("sclid", "sharechat"),
    ("zclid", "zomato"),
    ("fclid", "flipkart"),
    ("pclid", "paytm"),
    ("mclid", "makemytrip"),
    ("oclid", "ola"),
    ("uclid", "uber"),
    ("jclid", "jio"),
    ("hclid", "hotstar"),
    ("gpclid", "googleplay"),
    ("aclid", "amazonin"),
];

fn owned(rows: &[(&str, &str)]) -> Vec<TableEntry> {
    rows.iter()
        .map(|(token, name)| TableEntry::new(*token, *name))
        .collect()
}

pub fn default_search_engines() -> Vec<TableEntry> {
    owned(SEARCH_ENGINES)
}

pub fn default_social_networks() -> Vec<TableEntry> {
    owned(SOCIAL_NETWORKS)
}

pub fn default_click_ids() -> Vec<TableEntry> {
    owned(CLICK_IDS)
}

/// The three lookup tables the resolver classifies against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTables {
    pub search_engines: Vec<TableEntry>,
    pub social_networks: Vec<TableEntry>,
    pub click_ids: Vec<TableEntry>,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            search_engines: default_search_engines(),
            social_networks: default_social_networks(),
            click_ids: default_click_ids(),
        }
    }
}

impl ReferenceTables {
    /// First search engine whose token occurs anywhere in `referrer`.
    pub fn search_engine(&self, referrer: &str) -> Option<&TableEntry> {
        self.search_engines
            .iter()
            .find(|entry| referrer.contains(entry.token.as_str()))
    }

    /// First social network whose host equals or parents `hostname`.
    pub fn social_network(&self, hostname: &str) -> Option<&TableEntry> {
        self.social_networks
            .iter()
            .find(|entry| is_domain_or_subdomain(hostname, &entry.token))
    }
}
