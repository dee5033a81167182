/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use crate::core::types::Pid;
use miette::Diagnostic;
use thiserror::Error;

// Re-export subsystem errors
pub use crate::memory::MemoryError;
pub use crate::process::ProcessError;

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum KernelError {
    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Unknown process: {0}")]
    #[diagnostic(
        code(kernel::unknown_process),
        help("The PID was never created. Use `inspect` to list live processes.")
    )]
    UnknownProcess(Pid),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(kernel::configuration_error),
        help("Invalid configuration. Review KERNEL_* environment variables.")
    )]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_error_display() {
        let error = KernelError::UnknownProcess(42);
        assert_eq!(error.to_string(), "Unknown process: 42");
    }

    #[test]
    fn test_kernel_error_from_memory_error() {
        let error: KernelError = MemoryError::NoFrames.into();
        assert!(matches!(error, KernelError::Memory(MemoryError::NoFrames)));
        assert!(error.to_string().starts_with("Memory error:"));
    }

    #[test]
    fn test_transparent_diagnostic_code() {
        let error: KernelError = MemoryError::UnknownProcess(7).into();
        let code = error.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("memory::unknown_process"));
    }
}
