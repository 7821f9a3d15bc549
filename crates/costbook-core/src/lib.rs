//! costbook-core: data model, file-backed stores, and the cost rollup
//! engine for construction cost estimation.
//!
//! The flow mirrors how estimates are built: master rate catalogs
//! ([`store::inventory`]) feed the rollup engine ([`rollup`]), which
//! produces work items stored in categories; projects assemble quantities
//! of work items into grand totals ([`store::document`]).
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::Error`] with machine-readable codes;
//!   malformed numeric input coerces instead of failing (see [`rollup`]).
//! - **Logging**: `tracing` macros (`warn!` on unreadable documents,
//!   `debug!` on store writes and skipped rollup lines).

pub mod error;
pub mod migrate;
pub mod model;
pub mod rollup;
pub mod store;
pub mod units;

pub use error::{Error, ErrorCode, Result};
