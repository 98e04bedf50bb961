use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("monitor is already running; call stop() before starting a new session")]
    AlreadyRunning,
    #[error("invalid interval: {0} seconds (allowed range: 1-3600 seconds)")]
    InvalidInterval(u64),
    #[error("invalid probe endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("http client setup failed: {0}")]
    ClientSetup(String),
    #[error("status sink rejected update: {0}")]
    StatusDelivery(String),
}
