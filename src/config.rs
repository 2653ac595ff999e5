//! Process-wide settings, initialized exactly once before any action runs.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TASK_RECORDER_WAIT_BEFORE_ACTION` | Seconds to wait before every action (empty = off) | off |
//! | `TASK_RECORDER_FAILSAFE` | Refuse to inject input while the pointer is at (0, 0) | `true` |
//! | `TASK_RECORDER_PAUSE_MS` | Pause after every injected primitive (ms) | `100` |
//! | `TASK_RECORDER_SCALING_TARGET` | Virtual resolution: `XGA`, `WXGA`, `FWXGA` | `XGA` |
//! | `TASK_RECORDER_TASKS_DIR` | Directory holding saved tasks | `tasks` |

use crate::capture::resolution::ScalingTarget;
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

pub const ENV_WAIT_BEFORE_ACTION: &str = "TASK_RECORDER_WAIT_BEFORE_ACTION";
pub const ENV_FAILSAFE: &str = "TASK_RECORDER_FAILSAFE";
pub const ENV_PAUSE_MS: &str = "TASK_RECORDER_PAUSE_MS";
pub const ENV_SCALING_TARGET: &str = "TASK_RECORDER_SCALING_TARGET";
pub const ENV_TASKS_DIR: &str = "TASK_RECORDER_TASKS_DIR";

pub const DEFAULT_PAUSE_MS: u64 = 100;
pub const DEFAULT_TASKS_DIR: &str = "tasks";

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Operator review window before each action
    pub wait_before_action: Option<Duration>,
    pub failsafe: bool,
    pub pause: Duration,
    pub scaling_target: ScalingTarget,
    pub tasks_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wait_before_action: None,
            failsafe: true,
            pause: Duration::from_millis(DEFAULT_PAUSE_MS),
            scaling_target: ScalingTarget::default(),
            tasks_dir: PathBuf::from(DEFAULT_TASKS_DIR),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Settings::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_WAIT_BEFORE_ACTION) {
            let secs: f64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_WAIT_BEFORE_ACTION, &raw))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(invalid(ENV_WAIT_BEFORE_ACTION, &raw));
            }
            settings.wait_before_action = Some(Duration::from_secs_f64(secs));
        }
        if let Some(raw) = get(ENV_FAILSAFE) {
            settings.failsafe = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(ENV_FAILSAFE, &raw)),
            };
        }
        if let Some(raw) = get(ENV_PAUSE_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| invalid(ENV_PAUSE_MS, &raw))?;
            settings.pause = Duration::from_millis(ms);
        }
        if let Some(raw) = get(ENV_SCALING_TARGET) {
            settings.scaling_target = raw.parse()?;
        }
        if let Some(raw) = get(ENV_TASKS_DIR) {
            settings.tasks_dir = PathBuf::from(raw);
        }
        Ok(settings)
    }
}

fn invalid(name: &str, value: &str) -> Error {
    Error::Configuration(format!("invalid value for {}: '{}'", name, value))
}

/// Install the process-wide settings. Fails if called more than once.
pub fn init(settings: Settings) -> Result<&'static Settings> {
    SETTINGS
        .set(settings)
        .map_err(|_| Error::Configuration("settings already initialized".to_string()))?;
    get()
}

/// Settings installed by [`init`]
pub fn get() -> Result<&'static Settings> {
    SETTINGS
        .get()
        .ok_or_else(|| Error::Configuration("settings not initialized".to_string()))
}
