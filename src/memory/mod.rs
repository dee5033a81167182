/*!
 * Memory Module
 * Demand paging over a fixed pool of physical frames
 */

pub mod paging;
pub mod types;

// Re-export for convenience
pub use paging::PagingEngine;
pub use types::*;
