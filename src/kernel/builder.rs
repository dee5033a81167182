/*!
 * Kernel Builder
 * Builder pattern for Kernel construction
 */

use super::config::KernelConfig;
use super::Kernel;
use crate::core::types::KernelResult;
use std::time::Duration;

/// Builder for Kernel
#[derive(Debug, Clone, Default)]
pub struct KernelBuilder {
    config: KernelConfig,
}

impl KernelBuilder {
    /// Start from the compiled-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn with_phys_frames(mut self, phys_frames: usize) -> Self {
        self.config.phys_frames = phys_frames;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Interval used by the background driver
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = interval;
        self
    }

    pub fn build(self) -> KernelResult<Kernel> {
        Kernel::new(self.config)
    }
}
