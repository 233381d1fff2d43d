use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::{ControllerSettings, SpringConfig};
use crate::models::{BusyPolicy, Viewport};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub swipe: SwipeSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct SwipeSettings {
    #[serde(default = "default_threshold_fraction")]
    pub threshold_fraction: f64,
    #[serde(default = "default_fly_off_duration_ms")]
    pub fly_off_duration_ms: u64,
    #[serde(default = "default_fly_off_margin")]
    pub fly_off_margin: f64,
    #[serde(default = "default_max_rotation_degrees")]
    pub max_rotation_degrees: f64,
    #[serde(default = "default_spring_friction")]
    pub spring_friction: f64,
    #[serde(default = "default_spring_tension")]
    pub spring_tension: f64,
    #[serde(default = "default_rest_threshold")]
    pub rest_displacement: f64,
    #[serde(default = "default_rest_threshold")]
    pub rest_speed: f64,
    #[serde(default)]
    pub busy_policy: BusyPolicy,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            threshold_fraction: default_threshold_fraction(),
            fly_off_duration_ms: default_fly_off_duration_ms(),
            fly_off_margin: default_fly_off_margin(),
            max_rotation_degrees: default_max_rotation_degrees(),
            spring_friction: default_spring_friction(),
            spring_tension: default_spring_tension(),
            rest_displacement: default_rest_threshold(),
            rest_speed: default_rest_threshold(),
            busy_policy: BusyPolicy::default(),
        }
    }
}

impl SwipeSettings {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            threshold_fraction: self.threshold_fraction,
            fly_off_duration: Duration::from_millis(self.fly_off_duration_ms),
            fly_off_margin: self.fly_off_margin,
            max_rotation_degrees: self.max_rotation_degrees,
            spring: SpringConfig {
                friction: self.spring_friction,
                tension: self.spring_tension,
                rest_displacement: self.rest_displacement,
                rest_speed: self.rest_speed,
            },
            busy_policy: self.busy_policy,
        }
    }
}

fn default_threshold_fraction() -> f64 { 0.25 }
fn default_fly_off_duration_ms() -> u64 { 250 }
fn default_fly_off_margin() -> f64 { 100.0 }
fn default_max_rotation_degrees() -> f64 { 10.0 }
fn default_spring_friction() -> f64 { 5.0 }
fn default_spring_tension() -> f64 { 40.0 }
fn default_rest_threshold() -> f64 { 0.01 }

/// Viewport assumed for sessions created without one
#[derive(Debug, Clone, Deserialize)]
pub struct ViewportSettings {
    #[serde(default = "default_viewport_width")]
    pub width: f64,
    #[serde(default = "default_viewport_height")]
    pub height: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl ViewportSettings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

fn default_viewport_width() -> f64 { 390.0 }
fn default_viewport_height() -> f64 { 844.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_true")]
    pub realtime_animation: bool,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_ttl_secs: default_idle_ttl_secs(),
            realtime_animation: true,
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

fn default_max_sessions() -> u64 { 10_000 }
fn default_idle_ttl_secs() -> u64 { 900 }
fn default_frame_interval_ms() -> u64 { 16 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LUME_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LUME__SWIPE__THRESHOLD_FRACTION -> swipe.threshold_fraction
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the swipe engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let swipe = &self.swipe;

        if !(swipe.threshold_fraction > 0.0 && swipe.threshold_fraction <= 1.0) {
            return Err(ConfigError::Message(format!(
                "swipe.threshold_fraction must be in (0, 1], got {}",
                swipe.threshold_fraction
            )));
        }
        if !(swipe.fly_off_margin.is_finite() && swipe.fly_off_margin >= 0.0) {
            return Err(ConfigError::Message("swipe.fly_off_margin must be >= 0".to_string()));
        }
        if !(swipe.spring_friction >= 0.0 && swipe.spring_tension >= 0.0) {
            return Err(ConfigError::Message(
                "swipe.spring_friction and swipe.spring_tension must be >= 0".to_string(),
            ));
        }
        if !(swipe.rest_displacement > 0.0 && swipe.rest_speed > 0.0) {
            return Err(ConfigError::Message(
                "swipe.rest_displacement and swipe.rest_speed must be > 0".to_string(),
            ));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Message("viewport width and height must be > 0".to_string()));
        }
        if self.sessions.frame_interval_ms == 0 {
            return Err(ConfigError::Message("sessions.frame_interval_ms must be > 0".to_string()));
        }

        Ok(())
    }
}
