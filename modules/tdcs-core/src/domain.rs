//! Root-domain normalization and same-property checks.

/// Return the last two dot-separated labels of `hostname`.
///
/// Hostnames with two labels or fewer come back unchanged. There is no
/// public-suffix awareness: `shop.example.co.uk` maps to `co.uk`. Existing
/// secondary-domain configurations rely on this behavior, so it stays.
pub fn root_domain(hostname: &str) -> String {
    let parts: Vec<&str> = hostname.split('.').collect();
    if parts.len() > 2 {
        parts[parts.len() - 2..].join(".")
    } else {
        hostname.to_string()
    }
}

/// True when `host` equals `domain` or is one of its subdomains.
pub fn is_domain_or_subdomain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Decides whether two root domains belong to the same logical property.
///
/// A property is the primary domain plus its configured secondary domains;
/// navigation between any of them counts as internal.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    primary: String,
    secondaries: Vec<String>,
}

impl DomainClassifier {
    pub fn new(primary: impl Into<String>, secondaries: impl IntoIterator<Item = String>) -> Self {
        Self {
            primary: primary.into(),
            secondaries: secondaries.into_iter().collect(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Exact membership in the secondary-domain set.
    pub fn is_secondary(&self, domain: &str) -> bool {
        self.secondaries.iter().any(|d| d == domain)
    }

    fn is_property(&self, domain: &str) -> bool {
        domain == self.primary || self.is_secondary(domain)
    }

    pub fn is_internal(&self, current_root: &str, referrer_root: &str) -> bool {
        if current_root == referrer_root {
            return true;
        }
        // primary<->secondary and secondary<->secondary; primary<->primary is
        // already covered by equality above.
        (self.is_secondary(current_root) && self.is_property(referrer_root))
            || (current_root == self.primary && self.is_secondary(referrer_root))
    }

    /// Campaign value used whenever a default campaign has to be filled in.
    pub fn default_campaign(&self, current_root: &str) -> String {
        if self.is_secondary(current_root) {
            current_root.to_string()
        } else {
            NOT_SET.to_string()
        }
    }
}

/// Sentinel campaign for traffic without an explicit campaign.
pub const NOT_SET: &str = "(not set)";
