use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{fs, io};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::info;

use upplink::{AlarmSink, ConnectivityStatus, StatusSink, tone};

use crate::bus;

/// Marshals monitor callbacks onto the broadcast bus, decoupling the loop's
/// task from whatever is rendering
pub struct BusStatusSink;

impl StatusSink for BusStatusSink {
    fn on_status(&self, status: ConnectivityStatus, at: DateTime<Utc>) -> anyhow::Result<()> {
        bus::publish_status(status, at);
        Ok(())
    }

    fn on_fault(&self, message: &str) {
        bus::publish_fault(message.to_string());
    }
}

/// Alarm device for a headless console: rings the terminal bell and, when
/// configured, renders the fallback tone to a WAV file an external player
/// can loop. Rendering happens once per process.
pub struct ConsoleAlarm {
    wav_path: Option<PathBuf>,
    rendered: Mutex<bool>,
}

impl ConsoleAlarm {
    pub fn new(wav_path: Option<PathBuf>) -> Self {
        Self { wav_path, rendered: Mutex::new(false) }
    }
}

impl AlarmSink for ConsoleAlarm {
    fn start(&self, frequency_hz: u32, tone_duration_ms: u32) -> anyhow::Result<()> {
        if let Some(path) = &self.wav_path {
            let mut rendered = self.rendered.lock().expect("render flag poisoned");
            if !*rendered {
                let wav = tone::sine_wave_wav(f64::from(frequency_hz), tone_duration_ms);
                fs::write(path, wav)
                    .with_context(|| format!("rendering alarm tone to {}", path.display()))?;
                *rendered = true;
                info!(path = %path.display(), "alarm tone rendered; loop it with any player");
            }
        }

        // Terminal bell as the minimal audible fallback
        print!("\x07");
        io::stdout().flush()?;
        bus::publish_alarm(true);
        Ok(())
    }

    fn stop(&self) -> anyhow::Result<()> {
        bus::publish_alarm(false);
        Ok(())
    }
}
