pub mod bridge;
pub mod referrer;

pub use bridge::{
    FormBridge, FormRegistry, FormWidget, SubmitHook, NULL_VALUE, RECORD_FIELD, REFERRER_FIELD,
};
pub use referrer::rebuild_referrer;
