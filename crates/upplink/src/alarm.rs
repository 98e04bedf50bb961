use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

/// Alarm device seam
///
/// Implementations own actual sound production (or a stand-in for it); the
/// monitor only needs start/stop semantics. Both calls may fail without
/// affecting monitoring.
pub trait AlarmSink: Send + Sync {
    fn start(&self, frequency_hz: u32, tone_duration_ms: u32) -> anyhow::Result<()>;
    fn stop(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
struct AlarmLatch {
    sounding: bool,
    warned: bool,
}

/// Stateful wrapper over an [`AlarmSink`]
///
/// Turns raw start/stop into start-if-not-already and stop-if-sounding, so
/// concurrent callers (the loop and the manual check path) cannot double-start
/// the device or make it flap. Invariant: `is_sounding()` is true iff the
/// most recent successful transition was a start.
pub struct Alarm {
    sink: Arc<dyn AlarmSink>,
    frequency_hz: u32,
    tone_duration_ms: u32,
    latch: Mutex<AlarmLatch>,
}

impl Alarm {
    pub fn new(sink: Arc<dyn AlarmSink>, frequency_hz: u32, tone_duration_ms: u32) -> Self {
        Self { sink, frequency_hz, tone_duration_ms, latch: Mutex::new(AlarmLatch::default()) }
    }

    /// Start the alarm unless it is already sounding.
    ///
    /// A device failure is reported once per alarm lifetime and leaves the
    /// latch silent; monitoring continues either way.
    pub fn engage(&self) {
        let mut latch = self.latch.lock().expect("alarm latch poisoned");
        if latch.sounding {
            return;
        }
        match self.sink.start(self.frequency_hz, self.tone_duration_ms) {
            Ok(()) => latch.sounding = true,
            Err(e) => {
                if !latch.warned {
                    warn!(error = %e, "alarm device failed to start; continuing without sound");
                    latch.warned = true;
                }
            }
        }
    }

    /// Stop the alarm if it is sounding.
    ///
    /// The latch clears even if the device rejects the stop, so a broken
    /// device cannot wedge the alarm state.
    pub fn silence(&self) {
        let mut latch = self.latch.lock().expect("alarm latch poisoned");
        if !latch.sounding {
            return;
        }
        if let Err(e) = self.sink.stop() {
            debug!(error = %e, "alarm device failed to stop");
        }
        latch.sounding = false;
    }

    pub fn is_sounding(&self) -> bool {
        self.latch.lock().expect("alarm latch poisoned").sounding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Call {
        Start,
        Stop,
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<Call>>,
        fail_start: bool,
    }

    impl AlarmSink for RecordingSink {
        fn start(&self, _frequency_hz: u32, _tone_duration_ms: u32) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(Call::Start);
            if self.fail_start { Err(anyhow!("no audio device")) } else { Ok(()) }
        }

        fn stop(&self) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(Call::Stop);
            Ok(())
        }
    }

    #[test]
    fn test_engage_is_idempotent() {
        let sink = Arc::new(RecordingSink::default());
        let alarm = Alarm::new(sink.clone(), 800, 1000);

        alarm.engage();
        alarm.engage();
        alarm.engage();

        assert!(alarm.is_sounding());
        assert_eq!(*sink.calls.lock().unwrap(), vec![Call::Start]);
    }

    #[test]
    fn test_silence_is_idempotent() {
        let sink = Arc::new(RecordingSink::default());
        let alarm = Alarm::new(sink.clone(), 800, 1000);

        alarm.silence(); // silent already, device untouched
        alarm.engage();
        alarm.silence();
        alarm.silence();

        assert!(!alarm.is_sounding());
        assert_eq!(*sink.calls.lock().unwrap(), vec![Call::Start, Call::Stop]);
    }

    #[test]
    fn test_device_failure_leaves_latch_silent() {
        let sink = Arc::new(RecordingSink { fail_start: true, ..Default::default() });
        let alarm = Alarm::new(sink.clone(), 800, 1000);

        alarm.engage();
        assert!(!alarm.is_sounding());

        // A later engage may retry the device; it must still end up silent
        alarm.engage();
        assert!(!alarm.is_sounding());
        assert_eq!(*sink.calls.lock().unwrap(), vec![Call::Start, Call::Start]);
    }
}
