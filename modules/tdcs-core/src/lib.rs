pub mod config;
pub mod debug;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod file_config;
pub mod identity;
pub mod memo;
pub mod page;
pub mod record;
pub mod resolver;
pub mod storage;
pub mod tables;
pub mod tracker;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{FieldMapping, TrackerConfig};
pub use debug::DebugChannel;
pub use error::{AttributionError, AttributionResult, StorageError, StorageResult};
pub use file_config::load_config;
pub use identity::DurableIdentity;
pub use page::PageLoad;
pub use record::{AttributionRecord, UTM_PARAMS};
pub use resolver::{Channel, Resolution, Resolver};
pub use storage::{CookieJar, DurableStore, MemorySessionStore, SessionStore};
pub use tracker::{Attribution, Tracker};
