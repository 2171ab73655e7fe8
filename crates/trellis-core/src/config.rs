use crate::logging::DEFAULT_FILTER;
use crate::profiling::{self, ProfilingBackend};

/// Process-level configuration for a trellis application.
///
/// ```
/// use trellis_core::config::{Config, ProfilingMode};
///
/// let config = Config::default()
///     .with_log_filter("warn,trellis_ui=trace")
///     .with_profiling(ProfilingMode::On);
/// config.apply();
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Config {
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_profiling(mut self, mode: ProfilingMode) -> Self {
        self.profiling = mode;
        self
    }

    /// Install logging and profiling as configured.
    pub fn apply(&self) {
        crate::logging::init_with_filter(&self.log_filter);
        match self.profiling {
            ProfilingMode::Off => {}
            ProfilingMode::On => profiling::init_profiling(ProfilingBackend::InProcess),
            #[cfg(feature = "profiling")]
            ProfilingMode::WithWebserver => profiling::init_profiling(ProfilingBackend::PuffinHttp),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling is disabled
    Off,
    /// Profiling scopes are recorded in-process
    On,
    /// Profiling is enabled and served to external tools such as 'puffin_viewer'
    #[cfg(feature = "profiling")]
    WithWebserver,
}
