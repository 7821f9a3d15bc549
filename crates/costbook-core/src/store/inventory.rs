//! Master inventory store: one tabular catalog file per trade.
//!
//! On-disk layout is fixed for compatibility with pre-existing files:
//! `[SerialNo, <Trade>Type, Unit, Price]` with a header row. The
//! trade-specific type column maps to the canonical `name` field on load
//! and back on save.
//!
//! Loading is best-effort: a missing file is an empty catalog, a bad price
//! coerces to 0.0, and rows without a serial number get a fresh UUID so
//! the row stays addressable.

use crate::error::{Error, ErrorCode, Result};
use crate::model::{MasterItem, Trade};
use crate::store::table;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct InventoryStore {
    dir: PathBuf,
}

impl InventoryStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, trade: Trade) -> PathBuf {
        self.dir.join(trade.file_name())
    }

    /// All catalog entries for one trade, in file order.
    ///
    /// # Errors
    ///
    /// Only real I/O failures; a missing file is an empty catalog.
    pub fn list(&self, trade: Trade) -> Result<Vec<MasterItem>> {
        let text = match std::fs::read_to_string(self.path(trade)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Storage(e)),
        };
        Ok(parse_catalog(trade, &text))
    }

    /// Id-keyed lookup map for one trade.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list`].
    pub fn map_by_id(&self, trade: Trade) -> Result<HashMap<String, MasterItem>> {
        Ok(self
            .list(trade)?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect())
    }

    /// Add a catalog entry; returns the assigned id.
    ///
    /// Ids are `max(existing numeric ids) + 1`, stringified; non-integer
    /// ids in legacy rows are ignored in the max computation.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when name or unit is empty or price is zero;
    /// [`Error::Storage`] on write failure.
    pub fn create(&self, trade: Trade, name: &str, unit: &str, price: f64) -> Result<String> {
        validate_fields(name, unit, price)?;
        let mut items = self.list(trade)?;
        let max_id = items
            .iter()
            .filter_map(|item| item.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let id = (max_id + 1).to_string();
        items.push(MasterItem {
            id: id.clone(),
            name: name.to_string(),
            unit: unit.to_string(),
            price,
        });
        self.save(trade, &items)?;
        Ok(id)
    }

    /// Replace the name/unit/price of an existing entry.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] on empty/zero fields; [`Error::NotFound`] when
    /// no entry has the given id; [`Error::Storage`] on write failure.
    pub fn update(&self, trade: Trade, id: &str, name: &str, unit: &str, price: f64) -> Result<()> {
        validate_fields(name, unit, price)?;
        let mut items = self.list(trade)?;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Err(Error::not_found(
                ErrorCode::MasterItemNotFound,
                "master item",
                id,
            ));
        };
        item.name = name.to_string();
        item.unit = unit.to_string();
        item.price = price;
        self.save(trade, &items)
    }

    /// Remove an entry by id. Removing an id that does not exist is a
    /// no-op: deletes are idempotent, and existing work items keep their
    /// snapshotted lines either way.
    ///
    /// # Errors
    ///
    /// [`Error::Storage`] on write failure.
    pub fn delete(&self, trade: Trade, id: &str) -> Result<()> {
        let mut items = self.list(trade)?;
        items.retain(|item| item.id != id);
        self.save(trade, &items)
    }

    fn save(&self, trade: Trade, items: &[MasterItem]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut out = String::new();
        let header = [
            "SerialNo".to_string(),
            trade.type_column().to_string(),
            "Unit".to_string(),
            "Price".to_string(),
        ];
        out.push_str(&table::render_record(&header));
        out.push('\n');
        for item in items {
            let row = [
                item.id.clone(),
                item.name.clone(),
                item.unit.clone(),
                item.price.to_string(),
            ];
            out.push_str(&table::render_record(&row));
            out.push('\n');
        }
        tracing::debug!(trade = %trade, rows = items.len(), "rewriting catalog file");
        std::fs::write(self.path(trade), out)?;
        Ok(())
    }
}

/// All three fields must be present: empty name, empty unit, or a zero
/// price rejects the whole operation before any state change.
fn validate_fields(name: &str, unit: &str, price: f64) -> Result<()> {
    if name.trim().is_empty() || unit.trim().is_empty() || price == 0.0 {
        return Err(Error::Validation {
            code: ErrorCode::IncompleteMasterItem,
            message: "master items need a name, a unit, and a non-zero price".to_string(),
        });
    }
    Ok(())
}

fn parse_catalog(trade: Trade, text: &str) -> Vec<MasterItem> {
    let records = table::split_records(text);
    let Some((header, rows)) = records.split_first() else {
        return Vec::new();
    };

    let col = |name: &str| header.iter().position(|h| h == name);
    let serial_col = col("SerialNo");
    // Legacy files may carry a bare `Type` column instead of e.g. `LaborType`.
    let name_col = col(trade.type_column()).or_else(|| col("Type"));
    let unit_col = col("Unit");
    let price_col = col("Price");

    let field = |row: &[String], idx: Option<usize>| {
        idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
    };

    rows.iter()
        .map(|row| {
            let id = match serial_col.and_then(|i| row.get(i)) {
                Some(serial) if !serial.is_empty() => serial.clone(),
                // Row predates serial numbers; give it a stable-for-this-load
                // handle so it stays addressable.
                _ => uuid::Uuid::new_v4().to_string(),
            };
            let price = field(row, price_col).trim().parse::<f64>().unwrap_or(0.0);
            MasterItem {
                id,
                name: field(row, name_col),
                unit: field(row, unit_col),
                price,
            }
        })
        .collect()
}
