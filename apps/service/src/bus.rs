use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;

use upplink::ConnectivityStatus;

/// Events crossing from the monitor's task into the render context
#[derive(Debug, Clone)]
pub enum ServiceEvent {
    Status { status: ConnectivityStatus, at: DateTime<Utc> },
    Alarm { sounding: bool },
    Fault(String),
}

static BUS_TX: OnceLock<broadcast::Sender<ServiceEvent>> = OnceLock::new();

fn bus() -> &'static broadcast::Sender<ServiceEvent> {
    BUS_TX.get_or_init(|| {
        let (tx, _rx) = broadcast::channel::<ServiceEvent>(64);
        tx
    })
}

pub fn subscribe() -> broadcast::Receiver<ServiceEvent> {
    bus().subscribe()
}

pub fn publish_status(status: ConnectivityStatus, at: DateTime<Utc>) {
    debug!(%status, "bus: publishing status update");
    publish(ServiceEvent::Status { status, at });
}

pub fn publish_alarm(sounding: bool) {
    debug!(sounding, "bus: publishing alarm transition");
    publish(ServiceEvent::Alarm { sounding });
}

pub fn publish_fault(message: String) {
    publish(ServiceEvent::Fault(message));
}

fn publish(ev: ServiceEvent) {
    // Ignore errors if there are no receivers
    let _ = bus().send(ev);
}
