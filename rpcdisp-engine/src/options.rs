//! Per-call dispatch options

use crate::batch::BatchMode;
use crate::config::DispatchConfig;
use crate::metrics::DispatchMetrics;
use rpcdisp_core::{Codec, JsonCodec};
use std::any::Any;
use std::sync::Arc;

/// Options recognised by the dispatch entry points
///
/// ```rust
/// use rpcdisp_engine::{BatchMode, DispatchConfig, DispatchOptions};
///
/// let config = DispatchConfig { debug: Some(true), ..Default::default() };
/// let options = DispatchOptions::from_config(&config)
///     .batch_mode(BatchMode::Parallel)
///     .extra("tenant-42".to_string());
///
/// assert!(options.debug);
/// assert_eq!(options.batch_mode, BatchMode::Parallel);
/// ```
#[derive(Clone)]
pub struct DispatchOptions {
    /// Include diagnostic `data` in engine-generated error responses
    pub debug: bool,
    /// Abbreviate long values in the request/response log
    pub trim_log_values: bool,
    /// How batch members are evaluated
    pub batch_mode: BatchMode,
    /// Opaque host value forwarded to every method's context
    pub extra: Option<Arc<dyn Any + Send + Sync>>,
    /// Text <-> JSON conversion
    pub codec: Arc<dyn Codec>,
    /// Instruments to record into, if any
    pub metrics: Option<Arc<DispatchMetrics>>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            debug: false,
            trim_log_values: false,
            batch_mode: BatchMode::default(),
            extra: None,
            codec: Arc::new(JsonCodec::default()),
            metrics: None,
        }
    }
}

impl DispatchOptions {
    /// Built-in defaults overlaid with configured values
    pub fn from_config(config: &DispatchConfig) -> Self {
        let defaults = Self::default();
        Self {
            debug: config.debug.unwrap_or(defaults.debug),
            trim_log_values: config.trim_log_values.unwrap_or(defaults.trim_log_values),
            batch_mode: config.batch_mode.unwrap_or(defaults.batch_mode),
            ..defaults
        }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn trim_log_values(mut self, trim: bool) -> Self {
        self.trim_log_values = trim;
        self
    }

    pub fn batch_mode(mut self, mode: BatchMode) -> Self {
        self.batch_mode = mode;
        self
    }

    /// Forward a host value to every method's [`Context`](crate::Context)
    pub fn extra<T: Any + Send + Sync>(mut self, extra: T) -> Self {
        self.extra = Some(Arc::new(extra));
        self
    }

    /// Forward an already shared host value
    pub fn extra_arc(mut self, extra: Arc<dyn Any + Send + Sync>) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn metrics(mut self, metrics: Arc<DispatchMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl std::fmt::Debug for DispatchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchOptions")
            .field("debug", &self.debug)
            .field("trim_log_values", &self.trim_log_values)
            .field("batch_mode", &self.batch_mode)
            .field("extra", &self.extra.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
