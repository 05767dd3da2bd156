pub mod config;
pub mod core;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::StreamConfig;
pub use core::*;
pub use utils::retry::{Backoff, RetryPolicy, with_retry};
