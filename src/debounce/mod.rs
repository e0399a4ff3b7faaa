//! Debounce module
//!
//! Turns a stream of rapidly changing values (keystrokes in a search box)
//! into a stream that only yields once the input has settled.

mod stream;

pub use stream::{debounce, DebounceExt, Debounced};

/// Default quiet period for search input
pub const DEFAULT_DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(500);

#[cfg(test)]
mod tests;
