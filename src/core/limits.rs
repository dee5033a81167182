/*!
 * System Limits and Constants
 *
 * Defaults for the simulated machine. Everything here can be overridden
 * through `KernelConfig`.
 */

use std::time::Duration;

// =============================================================================
// MEMORY
// =============================================================================

/// Physical frames available to the paging engine
pub const DEFAULT_PHYS_FRAMES: usize = 6;

/// Upper bound on the frame table size
pub const MAX_PHYS_FRAMES: usize = 1 << 20;

/// Bytes per virtual page / physical frame
pub const DEFAULT_PAGE_SIZE: usize = 64;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Priority assigned when the caller does not pick one
pub const DEFAULT_PRIORITY: i32 = 1;

/// Interval between background driver steps
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Lower bound for the driver interval
/// Ticks faster than this only burn CPU on an empty ready queue
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

// =============================================================================
// ENVIRONMENT
// =============================================================================

pub const ENV_PHYS_FRAMES: &str = "KERNEL_PHYS_FRAMES";
pub const ENV_PAGE_SIZE: &str = "KERNEL_PAGE_SIZE";
pub const ENV_TICK_MS: &str = "KERNEL_TICK_MS";
pub const ENV_TRACE_JSON: &str = "KERNEL_TRACE_JSON";
