use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::domain::DomainClassifier;
use crate::file_config::load_config;
use crate::resolver::Resolver;
use crate::tables::{
    default_click_ids, default_search_engines, default_social_networks, ReferenceTables, TableEntry,
};

/// Maps a record attribute onto a form field name.
///
/// `param` is the attribute's stored name: one of the UTM parameters or any
/// other record key such as `clid` or `landing_page`. Unknown names and
/// empty values submit as `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    pub param: String,
    pub field: String,
}

impl FieldMapping {
    pub fn new(param: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            field: field.into(),
        }
    }
}

/// Form field names used by the Marketo `mkt_utm_*` convention.
pub fn default_utm_fields() -> Vec<FieldMapping> {
    [
        ("utm_source", "mkt_utm_source"),
        ("utm_medium", "mkt_utm_medium"),
        ("utm_campaign", "mkt_utm_campaign"),
        ("utm_content", "mkt_utm_content"),
        ("utm_term", "mkt_utm_term"),
        ("utm_adgroup", "mkt_utm_adgroup"),
        ("utm_keyword", "mkt_utm_keyword"),
    ]
    .into_iter()
    .map(|(param, field)| FieldMapping::new(param, field))
    .collect()
}

/// Operator configuration for the tracker.
///
/// Loaded from TOML (see [`load_config`]) with environment overrides on top.
/// Only `primary_domain` is required in a file; everything else falls back
/// to the built-in tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    pub primary_domain: String,
    #[serde(default)]
    pub secondary_domains: Vec<String>,
    #[serde(default = "default_utm_fields")]
    pub utm_fields: Vec<FieldMapping>,
    #[serde(default = "default_search_engines")]
    pub search_engines: Vec<TableEntry>,
    #[serde(default = "default_social_networks")]
    pub social_networks: Vec<TableEntry>,
    #[serde(default = "default_click_ids")]
    pub click_ids: Vec<TableEntry>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            primary_domain: "yourdomain.com".to_string(),
            secondary_domains: vec!["domain2.com".to_string(), "domain3.com".to_string()],
            utm_fields: default_utm_fields(),
            search_engines: default_search_engines(),
            social_networks: default_social_networks(),
            click_ids: default_click_ids(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from the environment.
    ///
    /// `TDCS_CONFIG` points at a TOML file (built-in defaults when unset);
    /// `TDCS_PRIMARY_DOMAIN` and `TDCS_SECONDARY_DOMAINS` (comma-separated)
    /// override the file. A `.env` file is honoured if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = match std::env::var("TDCS_CONFIG") {
            Ok(path) => load_config(Path::new(&path))?,
            Err(_) => Self::default(),
        }
        .with_overrides(|key| std::env::var(key).ok());

        config.log_domains();
        Ok(config)
    }

    /// Apply `TDCS_PRIMARY_DOMAIN` / `TDCS_SECONDARY_DOMAINS` from `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(primary) = lookup("TDCS_PRIMARY_DOMAIN") {
            let primary = primary.trim();
            if !primary.is_empty() {
                self.primary_domain = primary.to_string();
            }
        }
        if let Some(list) = lookup("TDCS_SECONDARY_DOMAINS") {
            self.secondary_domains = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        self
    }

    pub fn tables(&self) -> ReferenceTables {
        ReferenceTables {
            search_engines: self.search_engines.clone(),
            social_networks: self.social_networks.clone(),
            click_ids: self.click_ids.clone(),
        }
    }

    pub fn classifier(&self) -> DomainClassifier {
        DomainClassifier::new(self.primary_domain.clone(), self.secondary_domains.clone())
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.classifier(), self.tables())
    }

    fn log_domains(&self) {
        tracing::info!("Tracker config loaded:");
        tracing::info!("  primary domain: {}", self.primary_domain);
        tracing::info!("  secondary domains: {}", self.secondary_domains.join(", "));
        tracing::info!(
            "  tables: {} search engines, {} social networks, {} click ids",
            self.search_engines.len(),
            self.social_networks.len(),
            self.click_ids.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn default_matches_builtin_tables() {
        let config = TrackerConfig::default();
        assert_eq!(config.primary_domain, "yourdomain.com");
        assert_eq!(config.utm_fields.len(), 7);
        assert_eq!(
            config.utm_fields[0],
            FieldMapping::new("utm_source", "mkt_utm_source")
        );
        assert_eq!(config.tables(), ReferenceTables::default());
    }

    #[test]
    fn overrides_replace_domains() {
        let config = TrackerConfig::default().with_overrides(lookup(&[
            ("TDCS_PRIMARY_DOMAIN", " acme.com "),
            ("TDCS_SECONDARY_DOMAINS", "acme.io, ,acme.dev"),
        ]));
        assert_eq!(config.primary_domain, "acme.com");
        assert_eq!(config.secondary_domains, vec!["acme.io", "acme.dev"]);
    }

    #[test]
    fn missing_overrides_leave_config_alone() {
        let config = TrackerConfig::default().with_overrides(lookup(&[]));
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn empty_secondary_override_clears_list() {
        let cleared = lookup(&[("TDCS_SECONDARY_DOMAINS", "")]);
        let config = TrackerConfig::default().with_overrides(cleared);
        assert!(config.secondary_domains.is_empty());
    }

    #[test]
    fn resolver_uses_configured_domains() {
        let config = TrackerConfig {
            primary_domain: "acme.com".into(),
            secondary_domains: vec!["acme.io".into()],
            ..TrackerConfig::default()
        };
        let resolver = config.resolver();
        let classifier = resolver.classifier();
        assert_eq!(classifier.primary(), "acme.com");
        assert!(classifier.is_internal("acme.com", "acme.io"));
        assert!(!classifier.is_internal("acme.com", "domain2.com"));
        assert_eq!(resolver.tables(), &ReferenceTables::default());
    }
}
