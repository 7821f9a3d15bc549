//! File-backed stores.
//!
//! Two persistence shapes, both whole-file rewrites:
//!
//! - [`inventory::InventoryStore`] — one tabular catalog file per trade
//!   (`labor.csv`, `material.csv`, `equipment.csv`).
//! - [`document::DocumentStore`] — a single JSON document holding all
//!   categories and projects, behind a pluggable [`document::Backend`].
//!
//! Missing files are empty stores, never errors. There is no cross-process
//! locking; writes within one store handle are serialized, but two
//! processes rewriting the same file remain last-write-wins.

pub mod document;
pub mod inventory;
mod table;
