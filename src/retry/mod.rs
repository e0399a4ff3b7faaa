//! Retry module
//!
//! A bounded retry loop shared by load-more and refresh. Cancellation is never
//! retried; everything the error taxonomy marks retryable is.

mod policy;

pub use policy::{RetryPolicy, RetryPolicyBuilder};

#[cfg(test)]
mod tests;
