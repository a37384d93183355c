//! Opt-in diagnostics for a single page load.

/// Gate for diagnostic events. Pages turn it on by loading with `#debug`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugChannel {
    enabled: bool,
}

impl DebugChannel {
    pub const FRAGMENT: &'static str = "debug";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_fragment(fragment: Option<&str>) -> Self {
        Self::new(fragment == Some(Self::FRAGMENT))
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Emit a `tracing` debug event under the `tdcs` target when the channel is on.
#[macro_export]
macro_rules! page_debug {
    ($channel:expr, $($arg:tt)+) => {
        if $channel.enabled() {
            ::tracing::debug!(target: "tdcs", $($arg)+);
        }
    };
}
