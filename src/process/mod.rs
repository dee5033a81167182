/*!
 * Process Module
 * Process descriptors and the lifecycle state machine
 */

pub mod descriptor;
pub mod types;

// Re-export for convenience
pub use descriptor::{Process, SharedProcess};
pub use types::{ProcessError, ProcessInfo, ProcessResult, ProcessState};
