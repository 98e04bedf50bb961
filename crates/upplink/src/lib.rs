//! upplink - outbound connectivity monitoring core
//!
//! This library provides the monitoring engine behind upplink-service:
//! a bounded-timeout reachability prober, a cancellable polling loop that
//! debounces probe results into a tri-state status, and a latched alarm
//! driven by status transitions. Presentation (rendering status, producing
//! audio) is left to the sinks a caller plugs in.

pub mod alarm;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod status;
pub mod tone;
pub mod validation;

// Re-export main types
pub use alarm::{Alarm, AlarmSink};
pub use error::MonitorError;
pub use monitor::{Monitor, MonitorSettings, MonitorState, StatusSink};
pub use probe::{HttpProber, Prober, DEFAULT_ENDPOINT};
pub use status::ConnectivityStatus;

/// Re-export common error types
pub use anyhow;

/// Default polling interval in seconds
pub const DEFAULT_INTERVAL_SECONDS: u64 = 5;

/// Bounds on the polling interval, inclusive
pub const INTERVAL_RANGE_SECONDS: (u64, u64) = (1, 3600);
