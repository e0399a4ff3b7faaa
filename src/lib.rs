// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # listing-pager
//!
//! Client-side state for a paginated, searchable list backed by a REST API.
//!
//! ## Features
//!
//! - **Offset Pagination**: load the next page on demand, stop when exhausted
//! - **Pull to Refresh**: replace the list with a fresh first page
//! - **Search**: a query change resets paging; debounced input avoids a
//!   request per keystroke
//! - **Cancellation & Retry**: superseded requests are cancelled, transient
//!   failures retried with backoff
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing_pager::http::HttpClient;
//! use listing_pager::pagination::{ControllerConfig, PaginationController};
//! use listing_pager::types::Product;
//!
//! #[tokio::main]
//! async fn main() -> listing_pager::Result<()> {
//!     let client = HttpClient::new()?;
//!     let controller: PaginationController<Product> =
//!         PaginationController::from_source(client, ControllerConfig::default());
//!
//!     controller.load_more().await;
//!     controller.on_query_change("phone");
//!     controller.load_more().await;
//!
//!     let snapshot = controller.snapshot();
//!     println!("{} items, exhausted: {}", snapshot.len(), snapshot.exhausted);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                Renderer (CLI, UI, tests)                  │
//! │  load_more()  refresh()  on_query_change()  snapshot()    │
//! └───────────────────────────────────────────────────────────┘
//!          │                               ▲
//! ┌────────┴─────────┬─────────────┬───────┴────────┐
//! │  Pagination      │   Retry     │   Debounce     │
//! ├──────────────────┼─────────────┼────────────────┤
//! │ Paging state     │ Attempts    │ Timer reset    │
//! │ Supersession     │ Backoff     │ on each input  │
//! │ Generations      │ Cancel-aware│                │
//! └──────────────────┴─────────────┴────────────────┘
//!          │
//! ┌────────┴─────────────────────────────────────────┐
//! │ HTTP: listing / search endpoint, timeout, cancel │
//! └──────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration loading
pub mod config;

/// HTTP fetch client with timeout, cancellation and rate limiting
pub mod http;

/// Retry policy
pub mod retry;

/// Debounced streams
pub mod debounce;

/// Pagination/search controller
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use config::PagerConfig;
pub use pagination::{ControllerConfig, LoadOutcome, PaginationController, Snapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
