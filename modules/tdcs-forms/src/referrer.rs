use tdcs_core::extract::case_insensitive_param;
use tdcs_core::{AttributionRecord, UTM_PARAMS};
use url::Url;

/// Rebuild the page URL a form reports as its referrer.
///
/// Non-UTM query parameters keep their original order, followed by the seven
/// UTM parameters in [`UTM_PARAMS`] order. Each UTM value comes from the
/// record, falling back to a case-insensitive lookup on the page URL; empty
/// values are left out. The fragment, if any, is kept last.
pub fn rebuild_referrer(page_url: &Url, record: &AttributionRecord) -> String {
    let mut rebuilt = page_url.clone();
    rebuilt.set_query(None);
    rebuilt.set_fragment(None);
    let _ = rebuilt.set_username("");
    let _ = rebuilt.set_password(None);

    let mut pairs: Vec<(String, String)> = page_url
        .query_pairs()
        .filter(|(key, _)| !key.to_lowercase().starts_with("utm_"))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for param in UTM_PARAMS {
        let value = record
            .utm(param)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .or_else(|| case_insensitive_param(page_url, param))
            .filter(|v| !v.is_empty());
        if let Some(value) = value {
            pairs.push((param.to_string(), value));
        }
    }

    if !pairs.is_empty() {
        rebuilt.query_pairs_mut().extend_pairs(pairs);
    }
    if let Some(fragment) = page_url.fragment().filter(|f| !f.is_empty()) {
        rebuilt.set_fragment(Some(fragment));
    }
    rebuilt.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn non_utm_params_first_then_utm_in_fixed_order() {
        let record = AttributionRecord {
            utm_medium: Some("email".into()),
            ..Default::default()
        };
        let rebuilt = rebuild_referrer(
            &url("https://yourdomain.com/page?foo=1&utm_source=x&bar=2"),
            &record,
        );
        assert_eq!(
            rebuilt,
            "https://yourdomain.com/page?foo=1&bar=2&utm_source=x&utm_medium=email"
        );
    }

    #[test]
    fn record_values_take_priority() {
        let record = AttributionRecord {
            utm_source: Some("google".into()),
            utm_medium: Some("organic".into()),
            utm_campaign: Some("(not set)".into()),
            utm_keyword: Some("red shoes".into()),
            ..Default::default()
        };
        let rebuilt = rebuild_referrer(
            &url("https://yourdomain.com/?utm_source=ignored&UTM_Content=Banner"),
            &record,
        );
        assert_eq!(
            rebuilt,
            "https://yourdomain.com/?utm_source=google&utm_medium=organic\
             &utm_campaign=%28not+set%29&utm_content=banner&utm_keyword=red+shoes"
        );
    }

    #[test]
    fn utm_prefix_is_case_insensitive() {
        let rebuilt = rebuild_referrer(
            &url("https://yourdomain.com/?UTM_Term=a&keep=1"),
            &AttributionRecord::default(),
        );
        assert_eq!(rebuilt, "https://yourdomain.com/?keep=1&utm_term=a");
    }

    #[test]
    fn fragment_is_kept_last() {
        let record = AttributionRecord {
            utm_source: Some("direct".into()),
            ..Default::default()
        };
        let rebuilt = rebuild_referrer(&url("https://yourdomain.com/a/b?x=1#form"), &record);
        assert_eq!(
            rebuilt,
            "https://yourdomain.com/a/b?x=1&utm_source=direct#form"
        );
    }

    #[test]
    fn bare_page_stays_bare() {
        let page = url("https://yourdomain.com/a#");
        let rebuilt = rebuild_referrer(&page, &AttributionRecord::default());
        assert_eq!(rebuilt, "https://yourdomain.com/a");
    }

    #[test]
    fn credentials_are_dropped() {
        let rebuilt = rebuild_referrer(
            &url("https://user:pw@yourdomain.com/a"),
            &AttributionRecord::default(),
        );
        assert_eq!(rebuilt, "https://yourdomain.com/a");
    }
}
