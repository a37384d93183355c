//! Attribution resolution.
//!
//! Signals are tried in a fixed order and the first one present decides the
//! source and medium:
//!
//! 1. explicit UTM parameters on the page URL
//! 2. a paid click identifier on the page URL
//! 3. an external referrer (search engine, then social network, then any site)
//! 4. direct traffic
//!
//! Internal navigation (same root domain, or between the configured property
//! domains) never produces a non-direct attribution.

use url::Url;

use crate::domain::{root_domain, DomainClassifier, NOT_SET};
use crate::extract::{extract_search_query, query_pairs};
use crate::page::PageLoad;
use crate::page_debug;
use crate::tables::ReferenceTables;

/// Which signal produced an attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Explicit campaign parameters on the page URL.
    Campaign,
    /// Paid click identifier without UTM tagging.
    PaidClick,
    OrganicSearch,
    Social,
    /// External site not in the search or social tables.
    Referral,
    /// No referrer, or navigation within the property.
    Direct,
}

/// UTM attributes produced by one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub channel: Channel,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub utm_adgroup: Option<String>,
    pub utm_keyword: Option<String>,
    pub click_id: Option<String>,
}

/// Campaign parameters found on the page URL. Keys compare case-insensitively,
/// a repeated key keeps its last value and empty values count as absent.
#[derive(Debug, Default)]
struct CampaignParams {
    source: Option<String>,
    medium: Option<String>,
    utm_campaign: Option<String>,
    ga_campaign: Option<String>,
    cq_cmp: Option<String>,
    term: Option<String>,
    content: Option<String>,
    utm_adgroup: Option<String>,
    utm_ad_group: Option<String>,
    keyword: Option<String>,
}

impl CampaignParams {
    fn scan(pairs: &[(String, String)]) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = Some(value.clone()).filter(|v| !v.is_empty());
            let slot = match key.to_lowercase().as_str() {
                "utm_source" => &mut params.source,
                "utm_medium" => &mut params.medium,
                "utm_campaign" => &mut params.utm_campaign,
                "ga_campaign" => &mut params.ga_campaign,
                "cq_cmp" => &mut params.cq_cmp,
                "utm_term" => &mut params.term,
                "utm_content" => &mut params.content,
                "utm_adgroup" => &mut params.utm_adgroup,
                "utm_ad_group" => &mut params.utm_ad_group,
                "utm_keyword" => &mut params.keyword,
                _ => continue,
            };
            *slot = value;
        }
        params
    }

    fn campaign(&mut self) -> Option<String> {
        self.utm_campaign
            .take()
            .or_else(|| self.ga_campaign.take())
            .or_else(|| self.cq_cmp.take())
    }

    fn adgroup(&mut self) -> Option<String> {
        self.utm_adgroup.take().or_else(|| self.utm_ad_group.take())
    }
}

/// What the referrer says about the visit.
struct ReferrerView<'a> {
    raw: &'a str,
    hostname: Option<String>,
    root: String,
}

impl<'a> ReferrerView<'a> {
    fn parse(raw: &'a str) -> Self {
        let hostname = Url::parse(raw)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase));
        let root = hostname.as_deref().map(root_domain).unwrap_or_default();
        Self {
            raw,
            hostname,
            root,
        }
    }
}

/// Classifies a page load into UTM attributes.
#[derive(Debug, Clone)]
pub struct Resolver {
    classifier: DomainClassifier,
    tables: ReferenceTables,
}

impl Resolver {
    pub fn new(classifier: DomainClassifier, tables: ReferenceTables) -> Self {
        Self { classifier, tables }
    }

    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn resolve(&self, page: &PageLoad) -> Resolution {
        let debug = page.debug();
        let pairs = query_pairs(page.url());
        let current_root = page.root_domain();
        let default_campaign = || self.classifier.default_campaign(&current_root);

        let mut params = CampaignParams::scan(&pairs);
        let mut resolution = Resolution {
            channel: Channel::Campaign,
            utm_source: params.source.take(),
            utm_medium: params.medium.take(),
            utm_campaign: params.campaign(),
            utm_term: params.term.take(),
            utm_content: params.content.take(),
            utm_adgroup: params.adgroup(),
            utm_keyword: params.keyword.take(),
            click_id: None,
        };
        page_debug!(
            debug,
            utm_source = ?resolution.utm_source,
            utm_medium = ?resolution.utm_medium,
            utm_campaign = ?resolution.utm_campaign,
            "campaign parameters"
        );

        if resolution.utm_source.is_none() && resolution.utm_medium.is_none() {
            if let Some((entry, value)) = self.tables.click_ids.iter().find_map(|entry| {
                pairs
                    .iter()
                    .find(|(k, _)| *k == entry.token)
                    .map(|(_, v)| (entry, v))
            }) {
                resolution.channel = Channel::PaidClick;
                resolution.utm_source = Some(entry.name.clone());
                resolution.utm_medium = Some("cpc".to_string());
                resolution.click_id = Some(format!("{}:{}", entry.token, value));
                page_debug!(debug, click_id = ?resolution.click_id, "click identifier found");
            }
        }

        if resolution.utm_source.is_none() && resolution.utm_medium.is_none() {
            let referrer = ReferrerView::parse(page.referrer());
            let internal = !referrer.raw.is_empty()
                && self.classifier.is_internal(&current_root, &referrer.root);
            page_debug!(
                debug,
                referrer = referrer.raw,
                referrer_root = referrer.root.as_str(),
                internal,
                "referrer"
            );

            if !referrer.raw.is_empty() && !internal {
                self.classify_referrer(&referrer, &current_root, &mut resolution);
            } else {
                resolution.channel = Channel::Direct;
                resolution.utm_source = Some("direct".to_string());
                resolution.utm_medium = Some("none".to_string());
                resolution.utm_campaign = Some(default_campaign());
                page_debug!(debug, "no external referrer, direct");
            }
        }

        if resolution.utm_source.is_some()
            && resolution.utm_medium.is_some()
            && resolution.utm_campaign.is_none()
        {
            resolution.utm_campaign = Some(default_campaign());
        }

        page_debug!(
            debug,
            channel = ?resolution.channel,
            utm_source = ?resolution.utm_source,
            utm_medium = ?resolution.utm_medium,
            utm_campaign = ?resolution.utm_campaign,
            "resolved"
        );
        resolution
    }

    fn classify_referrer(
        &self,
        referrer: &ReferrerView<'_>,
        current_root: &str,
        resolution: &mut Resolution,
    ) {
        let campaign = if self.classifier.is_secondary(current_root) {
            Some(current_root.to_string())
        } else {
            resolution
                .utm_campaign
                .take()
                .or_else(|| Some(NOT_SET.to_string()))
        };

        let engine = self.tables.search_engine(referrer.raw);
        let (channel, source, medium) = if let Some(engine) = engine {
            if resolution.utm_keyword.is_none() {
                resolution.utm_keyword = extract_search_query(referrer.raw);
            }
            (Channel::OrganicSearch, engine.name.clone(), "organic")
        } else if let Some(network) = referrer
            .hostname
            .as_deref()
            .and_then(|host| self.tables.social_network(host))
        {
            (Channel::Social, network.name.clone(), "social")
        } else {
            let source = if referrer.root.is_empty() {
                referrer.raw.to_string()
            } else {
                referrer.root.clone()
            };
            (Channel::Referral, source, "referral")
        };

        resolution.channel = channel;
        resolution.utm_source = Some(source);
        resolution.utm_medium = Some(medium.to_string());
        resolution.utm_campaign = campaign;
    }
}
