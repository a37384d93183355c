//! Hands a resolved attribution to a third-party form widget.
//!
//! Every ready form gets one hidden field per configured UTM mapping plus the
//! encoded record, and a submit hook that rewrites the widget's reported
//! referrer to carry the resolved UTM parameters.

use serde_json::{Map, Value};
use tdcs_core::{
    envelope, page_debug, Attribution, AttributionRecord, DebugChannel, FieldMapping, PageLoad,
};
use url::Url;

use crate::referrer::rebuild_referrer;

/// Hidden field carrying the base64-encoded record.
pub const RECORD_FIELD: &str = "tdcs";
/// Submitted value the widget uses for the page referrer.
pub const REFERRER_FIELD: &str = "_mktoReferrer";
/// Placeholder for UTM attributes the record does not have.
pub const NULL_VALUE: &str = "NULL";

/// Rewrites the values a form submits.
pub type SubmitHook = Box<dyn Fn(Map<String, Value>) -> Map<String, Value>>;

/// A single form rendered by the widget.
pub trait FormWidget {
    fn id(&self) -> String;
    fn add_hidden_fields(&mut self, fields: &[(String, String)]);
    /// Register a hook run over the submitted values.
    fn on_submit(&mut self, hook: SubmitHook);
}

/// The widget's page-level entry point.
pub trait FormRegistry {
    type Form: FormWidget;

    /// Invoke `callback` for each form once it is ready.
    fn when_ready(&mut self, callback: &mut dyn FnMut(&mut Self::Form));
}

/// Feeds one page load's attribution into forms on that page.
#[derive(Debug, Clone)]
pub struct FormBridge {
    record: AttributionRecord,
    page_url: Url,
    utm_fields: Vec<FieldMapping>,
    debug: DebugChannel,
}

impl FormBridge {
    pub fn new(attribution: &Attribution, page: &PageLoad, utm_fields: &[FieldMapping]) -> Self {
        Self {
            record: attribution.record().clone(),
            page_url: page.url().clone(),
            utm_fields: utm_fields.to_vec(),
            debug: page.debug(),
        }
    }

    /// Hidden fields in mapping order, followed by the encoded record.
    pub fn hidden_fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .utm_fields
            .iter()
            .map(|mapping| {
                let value = self
                    .record
                    .field(&mapping.param)
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| NULL_VALUE.to_string());
                page_debug!(
                    self.debug,
                    param = %mapping.param,
                    field = %mapping.field,
                    value = value.as_str(),
                    "mapping"
                );
                (mapping.field.clone(), value)
            })
            .collect();

        let encoded = envelope::encode(&self.record).unwrap_or_default();
        fields.push((RECORD_FIELD.to_string(), encoded));
        fields
    }

    /// Override the referrer in submitted `values`.
    pub fn submission_values(&self, values: Map<String, Value>) -> Map<String, Value> {
        override_referrer(values, &self.page_url, &self.record, self.debug)
    }

    /// Wire one form: hidden fields now, referrer rewrite on submit.
    pub fn attach<F: FormWidget + ?Sized>(&self, form: &mut F) {
        page_debug!(self.debug, form_id = %form.id(), "form ready");
        form.add_hidden_fields(&self.hidden_fields());

        let page_url = self.page_url.clone();
        let record = self.record.clone();
        let debug = self.debug;
        form.on_submit(Box::new(move |values| {
            override_referrer(values, &page_url, &record, debug)
        }));
    }

    /// Attach to every form the widget reports ready. Returns whether a
    /// widget was present.
    pub fn install<R: FormRegistry>(&self, registry: Option<&mut R>) -> bool {
        let Some(registry) = registry else {
            page_debug!(self.debug, "form widget not detected");
            return false;
        };
        registry.when_ready(&mut |form| self.attach(form));
        true
    }
}

fn override_referrer(
    mut values: Map<String, Value>,
    page_url: &Url,
    record: &AttributionRecord,
    debug: DebugChannel,
) -> Map<String, Value> {
    let referrer = rebuild_referrer(page_url, record);
    page_debug!(debug, referrer = %referrer, "rewrote form referrer");
    values.insert(REFERRER_FIELD.to_string(), Value::String(referrer));
    values
}
