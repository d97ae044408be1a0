mod policy;

pub use policy::{RetryPolicy, DEFAULT_RETRY_DELAY, UNLIMITED_RETRIES};
