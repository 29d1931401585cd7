//! Runtime configuration.
use std::env;
use std::path::Path;
use std::time::Duration;

use nav_content::ConfigLoader;
use nav_core::MovementConfig;

use crate::api::ConfigError;

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Automatic ticks per second; `0` leaves ticking to [`RuntimeHandle::step`].
    ///
    /// [`RuntimeHandle::step`]: crate::RuntimeHandle::step
    pub tick_hz: u32,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    pub movement: MovementConfig,
    /// Seed for wait-and-reverse delays; entropy when unset.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            command_buffer_size: 32,
            event_buffer_size: 256,
            movement: MovementConfig::default(),
            rng_seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NAV_TICK_HZ` - Automatic ticks per second, `0` for manual stepping (default: 60)
    /// - `NAV_COMMAND_BUFFER` - Command queue capacity (default: 32)
    /// - `NAV_EVENT_BUFFER` - Per-topic event capacity (default: 256)
    /// - `NAV_RNG_SEED` - Fixed seed for wait-and-reverse delays
    /// - `NAV_MOVEMENT_CONFIG` - Path to a movement tuning TOML file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(hz) = read_var::<u32>(&lookup, "NAV_TICK_HZ")? {
            config.tick_hz = hz;
        }
        if let Some(size) = read_var::<usize>(&lookup, "NAV_COMMAND_BUFFER")? {
            config.command_buffer_size = size.max(1);
        }
        if let Some(size) = read_var::<usize>(&lookup, "NAV_EVENT_BUFFER")? {
            config.event_buffer_size = size.max(1);
        }
        config.rng_seed = read_var::<u64>(&lookup, "NAV_RNG_SEED")?;

        if let Some(path) = lookup("NAV_MOVEMENT_CONFIG") {
            config.movement =
                ConfigLoader::load(Path::new(&path)).map_err(|e| ConfigError::MovementFile {
                    path: path.clone(),
                    message: format!("{e:#}"),
                })?;
        }

        Ok(config)
    }

    /// Interval between automatic ticks, if any.
    pub fn tick_interval(&self) -> Option<Duration> {
        (self.tick_hz > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.tick_hz)))
    }
}

fn read_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
