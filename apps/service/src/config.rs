use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use upplink::{DEFAULT_ENDPOINT, DEFAULT_INTERVAL_SECONDS};

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file: {0}")]
    Read(std::io::Error),
    #[error("failed to write config file: {0}")]
    Write(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config path available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub monitor: Monitor,
    pub alarm: Alarm,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Monitor {
    pub endpoint: String,
    pub interval_seconds: u64,
    pub probe_timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Alarm {
    pub frequency_hz: u32,
    pub tone_duration_ms: u32,
    /// Where to render the fallback alarm tone; no file is written when unset
    pub wav_path: Option<path::PathBuf>,
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/upplink/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("upplink/config.toml"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: Monitor {
                endpoint: DEFAULT_ENDPOINT.into(),
                interval_seconds: DEFAULT_INTERVAL_SECONDS,
                probe_timeout_seconds: 6,
            },
            alarm: Alarm { frequency_hz: 800, tone_duration_ms: 1000, wav_path: None },
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Endpoint", &self.monitor.endpoint)?;
        write_1(f, "Interval (s)", &self.monitor.interval_seconds)?;
        write_1(f, "Probe Timeout (s)", &self.monitor.probe_timeout_seconds)?;
        write_title_1(f, "Alarm")?;
        write_1(f, "Frequency (Hz)", &self.alarm.frequency_hz)?;
        write_1(f, "Tone Duration (ms)", &self.alarm.tone_duration_ms)?;
        if let Some(path) = &self.alarm.wav_path {
            write_1(f, "Wav Path", &path.display())?;
        }

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/upplink/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(Error::Read)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::Write)?;
        }

        fs::write(path, config_str).map_err(Error::Write)
    }
}
