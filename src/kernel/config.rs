/*!
 * Kernel Configuration
 * Machine parameters with defaults and environment overrides
 */

use crate::core::errors::KernelError;
use crate::core::limits::{
    DEFAULT_PAGE_SIZE, DEFAULT_PHYS_FRAMES, DEFAULT_TICK_INTERVAL, ENV_PAGE_SIZE, ENV_PHYS_FRAMES,
    ENV_TICK_MS, MAX_PHYS_FRAMES, MIN_TICK_INTERVAL,
};
use crate::core::types::KernelResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Simulated machine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub phys_frames: usize,
    pub page_size: usize,
    #[serde(with = "millis")]
    pub tick_interval: Duration,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            phys_frames: DEFAULT_PHYS_FRAMES,
            page_size: DEFAULT_PAGE_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl KernelConfig {
    /// Defaults overridden by `KERNEL_PHYS_FRAMES`, `KERNEL_PAGE_SIZE` and
    /// `KERNEL_TICK_MS`
    pub fn from_env() -> KernelResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> KernelResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(frames) = parse_var::<usize>(&lookup, ENV_PHYS_FRAMES)? {
            config.phys_frames = frames;
        }
        if let Some(page_size) = parse_var::<usize>(&lookup, ENV_PAGE_SIZE)? {
            config.page_size = page_size;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_TICK_MS)? {
            config.tick_interval = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the paging engine or driver cannot run with
    pub fn validate(&self) -> KernelResult<()> {
        if self.phys_frames == 0 {
            return Err(KernelError::Configuration(
                "phys_frames must be at least 1".into(),
            ));
        }
        if self.phys_frames > MAX_PHYS_FRAMES {
            return Err(KernelError::Configuration(format!(
                "phys_frames {} exceeds limit {}",
                self.phys_frames, MAX_PHYS_FRAMES
            )));
        }
        if self.page_size == 0 {
            return Err(KernelError::Configuration(
                "page_size must be non-zero".into(),
            ));
        }
        if self.tick_interval < MIN_TICK_INTERVAL {
            return Err(KernelError::Configuration(format!(
                "tick_interval {:?} below minimum {:?}",
                self.tick_interval, MIN_TICK_INTERVAL
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> KernelResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| KernelError::Configuration(format!("{}={:?}: {}", key, raw, e))),
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
