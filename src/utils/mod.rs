pub mod retry;
pub use retry::{Backoff, RetryPolicy, with_retry};
