use serde::{Deserialize, Serialize};

/// The attribution attached to every lead captured during a browsing session.
///
/// Resolved once per session and then frozen: later page views read it back
/// from session storage rather than recomputing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionRecord {
    /// Absolute URL of the page that resolved this record.
    pub landing_page: String,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub utm_adgroup: Option<String>,
    pub utm_keyword: Option<String>,
    /// `<param>:<value>` of the paid click identifier, when that was the signal.
    #[serde(rename = "clid")]
    pub click_id: Option<String>,
    /// Page query string including the leading `?`, or empty.
    pub query_params: String,
    pub session_referrer: String,
    pub is_first_visit: bool,
    pub event_id: u32,
    /// `<event_id>.<unix seconds>` of the visitor's first recorded visit.
    pub initial_visit_id: String,
    /// Opaque analytics session cookie value.
    #[serde(rename = "ga_cookie")]
    pub third_party_session_id: Option<String>,
}

/// UTM parameter names in the order form submissions list them.
pub const UTM_PARAMS: [&str; 7] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
    "utm_adgroup",
    "utm_keyword",
];

impl AttributionRecord {
    /// Value of a UTM attribute by its parameter name.
    pub fn utm(&self, param: &str) -> Option<&str> {
        let value = match param {
            "utm_source" => &self.utm_source,
            "utm_medium" => &self.utm_medium,
            "utm_campaign" => &self.utm_campaign,
            "utm_term" => &self.utm_term,
            "utm_content" => &self.utm_content,
            "utm_adgroup" => &self.utm_adgroup,
            "utm_keyword" => &self.utm_keyword,
            _ => return None,
        };
        value.as_deref()
    }

    /// Value of any stored attribute by its wire name (`clid`, `ga_cookie`,
    /// `landing_page`, ...). Flags and numbers are rendered as text.
    pub fn field(&self, name: &str) -> Option<String> {
        if let Some(value) = self.utm(name) {
            return Some(value.to_string());
        }
        match name {
            "landing_page" => Some(self.landing_page.clone()),
            "clid" => self.click_id.clone(),
            "query_params" => Some(self.query_params.clone()),
            "session_referrer" => Some(self.session_referrer.clone()),
            "is_first_visit" => Some(self.is_first_visit.to_string()),
            "event_id" => Some(self.event_id.to_string()),
            "initial_visit_id" => Some(self.initial_visit_id.clone()),
            "ga_cookie" => self.third_party_session_id.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_lookup_by_name() {
        let record = AttributionRecord {
            utm_source: Some("newsletter".into()),
            utm_adgroup: Some("spring".into()),
            ..Default::default()
        };
        assert_eq!(record.utm("utm_source"), Some("newsletter"));
        assert_eq!(record.utm("utm_adgroup"), Some("spring"));
        assert_eq!(record.utm("utm_medium"), None);
        assert_eq!(record.utm("landing_page"), None);
    }

    #[test]
    fn field_lookup_covers_every_wire_name() {
        let record = AttributionRecord {
            landing_page: "https://yourdomain.com/".into(),
            utm_medium: Some("cpc".into()),
            click_id: Some("gclid:abc".into()),
            is_first_visit: true,
            event_id: 42,
            ..Default::default()
        };
        assert_eq!(record.field("utm_medium").as_deref(), Some("cpc"));
        assert_eq!(record.field("clid").as_deref(), Some("gclid:abc"));
        assert_eq!(
            record.field("landing_page").as_deref(),
            Some("https://yourdomain.com/")
        );
        assert_eq!(record.field("is_first_visit").as_deref(), Some("true"));
        assert_eq!(record.field("event_id").as_deref(), Some("42"));
        assert_eq!(record.field("ga_cookie"), None);
        assert_eq!(record.field("click_id"), None);
        assert_eq!(record.field("utm_term"), None);
    }

    #[test]
    fn serializes_with_legacy_wire_names() {
        let record = AttributionRecord {
            click_id: Some("gclid:abc".into()),
            third_party_session_id: Some("GA1.2.3.4".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["clid"], "gclid:abc");
        assert_eq!(json["ga_cookie"], "GA1.2.3.4");
        assert!(json["utm_source"].is_null());
        assert!(json.get("click_id").is_none());
    }
}
