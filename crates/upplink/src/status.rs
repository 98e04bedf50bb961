use serde::{Deserialize, Serialize};

/// Debounced outcome of connectivity probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Unknown,
    Connected,
    Disconnected,
}

impl ConnectivityStatus {
    /// Map a probe result. A running loop only ever reports
    /// connected/disconnected; `Unknown` is reserved for idle sessions.
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable { ConnectivityStatus::Connected } else { ConnectivityStatus::Disconnected }
    }
}

impl std::fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectivityStatus::Unknown => write!(f, "unknown"),
            ConnectivityStatus::Connected => write!(f, "connected"),
            ConnectivityStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}
