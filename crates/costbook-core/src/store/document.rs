//! The main document store: categories, work items, and projects live in
//! one JSON document (`costbook.json`).
//!
//! Every mutation is a whole-document read-modify-write serialized behind
//! a per-handle mutex; a failed operation leaves the document untouched.
//! A missing or corrupt file loads as the empty document, never an error.
//! Work items pass through [`crate::migrate::upgrade_work_item`] once at
//! load, so every record handed out satisfies the current schema.

use crate::error::{Error, ErrorCode, Result};
use crate::migrate::upgrade_work_item;
use crate::model::{Category, Project, ProjectLine, WorkItem};
use serde::{Deserialize, Serialize};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Name of the document file inside the data directory.
pub const DOCUMENT_FILE: &str = "costbook.json";

/// Storage seam for the document. Production uses [`FileBackend`]; tests
/// use [`MemBackend`].
pub trait Backend: Send + Sync {
    /// Read the raw document, `None` when it does not exist yet.
    fn load(&self) -> io::Result<Option<String>>;

    /// Replace the raw document.
    fn store(&self, contents: &str) -> io::Result<()>;
}

/// Whole-file JSON persistence.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Backend for FileBackend {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn store(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemBackend {
    cell: Mutex<Option<String>>,
}

impl MemBackend {
    /// A backend pre-seeded with raw document text.
    #[must_use]
    pub fn seeded(contents: impl Into<String>) -> Self {
        Self {
            cell: Mutex::new(Some(contents.into())),
        }
    }
}

impl Backend for MemBackend {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self
            .cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, contents: &str) -> io::Result<()> {
        *self.cell.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_string());
        Ok(())
    }
}

/// The persisted document shape: `{ "categories": [...], "projects": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Document {
    pub categories: Vec<Category>,
    pub projects: Vec<Project>,
}

pub struct DocumentStore {
    backend: Box<dyn Backend>,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    #[must_use]
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by `<data_dir>/costbook.json`.
    #[must_use]
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileBackend::new(
            data_dir.into().join(DOCUMENT_FILE),
        )))
    }

    /// Store backed by memory only; starts empty.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemBackend::default()))
    }

    fn load(&self) -> Result<Document> {
        let Some(text) = self.backend.load()? else {
            return Ok(Document::default());
        };
        let mut doc = match serde_json::from_str::<Document>(&text) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "document unreadable; starting from empty");
                Document::default()
            }
        };
        for category in &mut doc.categories {
            for item in &mut category.work_items {
                upgrade_work_item(item);
            }
        }
        Ok(doc)
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let text = serde_json::to_string_pretty(doc)
            .map_err(|e| Error::Storage(io::Error::new(ErrorKind::Other, e)))?;
        self.backend.store(&text)?;
        Ok(())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one read-modify-write cycle. The document is only written back
    /// when the mutation succeeds.
    fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let _guard = self.guard();
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.save(&doc)?;
        Ok(out)
    }

    // ── categories & work items ────────────────────────────────────────

    /// All categories, migrated to the current schema.
    ///
    /// # Errors
    ///
    /// Only real I/O failures.
    pub fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.load()?.categories)
    }

    /// One category by id.
    ///
    /// # Errors
    ///
    /// Only real I/O failures; an unknown id is `Ok(None)`.
    pub fn category(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.load()?.categories.into_iter().find(|c| c.id == id))
    }

    /// Create a category; returns its id.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the name is empty.
    pub fn create_category(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::empty_name("category"));
        }
        self.mutate(|doc| {
            let id = uuid::Uuid::new_v4().to_string();
            doc.categories.push(Category {
                id: id.clone(),
                name: name.to_string(),
                work_items: Vec::new(),
            });
            Ok(id)
        })
    }

    /// Flat search for a work item across all categories.
    ///
    /// # Errors
    ///
    /// Only real I/O failures; an unknown id is `Ok(None)`.
    pub fn find_work_item(&self, id: &str) -> Result<Option<WorkItem>> {
        Ok(self
            .load()?
            .categories
            .into_iter()
            .flat_map(|c| c.work_items)
            .find(|item| item.id == id))
    }

    /// Append a work item to a category.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown category.
    pub fn add_work_item(&self, category_id: &str, item: WorkItem) -> Result<()> {
        self.mutate(|doc| {
            category_mut(doc, category_id)?.work_items.push(item);
            Ok(())
        })
    }

    /// Replace a work item in place (matched by id, order preserved).
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown category or work item.
    pub fn replace_work_item(&self, category_id: &str, item: WorkItem) -> Result<()> {
        self.mutate(|doc| {
            let category = category_mut(doc, category_id)?;
            let Some(slot) = category.work_items.iter_mut().find(|w| w.id == item.id) else {
                return Err(Error::not_found(
                    ErrorCode::WorkItemNotFound,
                    "work item",
                    &item.id,
                ));
            };
            *slot = item;
            Ok(())
        })
    }

    /// Delete a work item from a category.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown category or work item.
    pub fn delete_work_item(&self, category_id: &str, item_id: &str) -> Result<()> {
        self.mutate(|doc| {
            let category = category_mut(doc, category_id)?;
            let before = category.work_items.len();
            category.work_items.retain(|w| w.id != item_id);
            if category.work_items.len() == before {
                return Err(Error::not_found(
                    ErrorCode::WorkItemNotFound,
                    "work item",
                    item_id,
                ));
            }
            Ok(())
        })
    }

    // ── projects ───────────────────────────────────────────────────────

    /// All projects.
    ///
    /// # Errors
    ///
    /// Only real I/O failures.
    pub fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.load()?.projects)
    }

    /// One project by id.
    ///
    /// # Errors
    ///
    /// Only real I/O failures; an unknown id is `Ok(None)`.
    pub fn project(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.load()?.projects.into_iter().find(|p| p.id == id))
    }

    /// Create a project; returns its id.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the name is empty.
    pub fn create_project(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::empty_name("project"));
        }
        self.mutate(|doc| {
            let id = uuid::Uuid::new_v4().to_string();
            doc.projects.push(Project {
                id: id.clone(),
                name: name.to_string(),
                items: Vec::new(),
            });
            Ok(id)
        })
    }

    /// Whole-record replace of a project, matched by id.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown project.
    pub fn update_project(&self, project: &Project) -> Result<()> {
        self.mutate(|doc| {
            let Some(slot) = doc.projects.iter_mut().find(|p| p.id == project.id) else {
                return Err(Error::not_found(
                    ErrorCode::ProjectNotFound,
                    "project",
                    &project.id,
                ));
            };
            *slot = project.clone();
            Ok(())
        })
    }

    /// Add a work item to a project, snapshotting its name, unit, and
    /// `sum_total` as the line's unit price. Returns the new line.
    ///
    /// The same work item can be added more than once; each insertion gets
    /// its own `instance_id`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown project or work item.
    pub fn add_project_line(
        &self,
        project_id: &str,
        work_item_id: &str,
        quantity: f64,
    ) -> Result<ProjectLine> {
        self.mutate(|doc| {
            let Some(work_item) = doc
                .categories
                .iter()
                .flat_map(|c| &c.work_items)
                .find(|w| w.id == work_item_id)
            else {
                return Err(Error::not_found(
                    ErrorCode::WorkItemNotFound,
                    "work item",
                    work_item_id,
                ));
            };
            let line = ProjectLine {
                instance_id: uuid::Uuid::new_v4().to_string(),
                work_item_id: work_item_id.to_string(),
                name: work_item.name.clone(),
                unit_of_measure: work_item.unit_of_measure.clone(),
                unit_price: work_item.sum_total,
                quantity,
            };
            let project = project_mut(doc, project_id)?;
            project.items.push(line.clone());
            Ok(line)
        })
    }

    /// Set one line's quantity from raw text. Coercion is lenient: text
    /// that fails to parse becomes 0, never an error.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown project or line instance.
    pub fn set_line_quantity(
        &self,
        project_id: &str,
        instance_id: &str,
        raw_quantity: &str,
    ) -> Result<()> {
        self.mutate(|doc| {
            let project = project_mut(doc, project_id)?;
            let Some(line) = project
                .items
                .iter_mut()
                .find(|l| l.instance_id == instance_id)
            else {
                return Err(Error::not_found(
                    ErrorCode::ProjectLineNotFound,
                    "project line",
                    instance_id,
                ));
            };
            line.quantity = raw_quantity.trim().parse::<f64>().unwrap_or(0.0);
            Ok(())
        })
    }
}

fn category_mut<'a>(doc: &'a mut Document, id: &str) -> Result<&'a mut Category> {
    doc.categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| Error::not_found(ErrorCode::CategoryNotFound, "category", id))
}

fn project_mut<'a>(doc: &'a mut Document, id: &str) -> Result<&'a mut Project> {
    doc.projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| Error::not_found(ErrorCode::ProjectNotFound, "project", id))
}

#[cfg(test)]
mod tests {
    use super::{DocumentStore, MemBackend};
    use crate::error::Error;
    use crate::model::{Trade, WorkItem};
    use crate::rollup::{compute_work_item, Catalogs, LineDraft, WorkItemDraft};
    use crate::store::inventory::InventoryStore;
    use tempfile::tempdir;

    fn seeded(json: &str) -> DocumentStore {
        DocumentStore::new(Box::new(MemBackend::seeded(json)))
    }

    #[test]
    fn corrupt_document_loads_as_empty() {
        let store = seeded("{not json");
        assert!(store.categories().unwrap().is_empty());
        assert!(store.projects().unwrap().is_empty());
    }

    #[test]
    fn category_lifecycle() {
        let store = DocumentStore::in_memory();
        let id = store.create_category("Masonry").unwrap();
        let cat = store.category(&id).unwrap().unwrap();
        assert_eq!(cat.name, "Masonry");
        assert!(cat.work_items.is_empty());
        assert!(store.category("nope").unwrap().is_none());
    }

    #[test]
    fn empty_names_are_rejected() {
        let store = DocumentStore::in_memory();
        assert!(matches!(
            store.create_category("  ").unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(matches!(
            store.create_project("").unwrap_err(),
            Error::Validation { .. }
        ));
        assert!(store.categories().unwrap().is_empty());
        assert!(store.projects().unwrap().is_empty());
    }

    #[test]
    fn work_item_add_replace_delete() {
        let store = DocumentStore::in_memory();
        let cat_id = store.create_category("Masonry").unwrap();
        let item = WorkItem {
            id: "w-1".to_string(),
            name: "Brickwork".to_string(),
            basis_quantity: 1.0,
            sum_total: 230.0,
            price_per_unit: 230.0,
            ..WorkItem::default()
        };
        store.add_work_item(&cat_id, item.clone()).unwrap();

        let other = WorkItem {
            id: "w-2".to_string(),
            name: "Plaster".to_string(),
            basis_quantity: 1.0,
            ..WorkItem::default()
        };
        store.add_work_item(&cat_id, other).unwrap();

        let replacement = WorkItem {
            name: "Brickwork, revised".to_string(),
            ..item
        };
        store.replace_work_item(&cat_id, replacement).unwrap();

        // Order is preserved: the replaced item keeps its slot.
        let cat = store.category(&cat_id).unwrap().unwrap();
        assert_eq!(cat.work_items[0].name, "Brickwork, revised");
        assert_eq!(cat.work_items[1].name, "Plaster");

        store.delete_work_item(&cat_id, "w-1").unwrap();
        let cat = store.category(&cat_id).unwrap().unwrap();
        assert_eq!(cat.work_items.len(), 1);

        assert!(matches!(
            store.delete_work_item(&cat_id, "w-1").unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            store.add_work_item("nope", WorkItem::default()).unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn find_work_item_searches_all_categories() {
        let store = DocumentStore::in_memory();
        let a = store.create_category("A").unwrap();
        let b = store.create_category("B").unwrap();
        store
            .add_work_item(&a, WorkItem { id: "w-a".into(), basis_quantity: 1.0, ..WorkItem::default() })
            .unwrap();
        store
            .add_work_item(&b, WorkItem { id: "w-b".into(), basis_quantity: 1.0, ..WorkItem::default() })
            .unwrap();
        assert!(store.find_work_item("w-b").unwrap().is_some());
        assert!(store.find_work_item("w-c").unwrap().is_none());
    }

    #[test]
    fn legacy_work_items_are_migrated_on_load() {
        let store = seeded(
            r#"{
                "categories": [{
                    "id": "c-1", "name": "Masonry",
                    "work_items": [{
                        "id": "w-1", "name": "Old", "unit_of_measure": "Cubic Meter",
                        "labor": [], "material": [], "equipment": [],
                        "labor_total": 0, "material_total": 0, "equipment_total": 0,
                        "total_cost_per_unit": 250.0,
                        "contractor_overhead_15_percent": 37.5,
                        "sum_total": 287.5
                    }]
                }],
                "projects": []
            }"#,
        );
        let item = store.find_work_item("w-1").unwrap().unwrap();
        assert_eq!(item.basis_quantity, 1.0);
        assert_eq!(item.price_per_unit, 287.5);
    }

    #[test]
    fn project_lines_snapshot_and_derive_totals() {
        let store = DocumentStore::in_memory();
        let cat_id = store.create_category("Masonry").unwrap();
        store
            .add_work_item(
                &cat_id,
                WorkItem {
                    id: "w-1".to_string(),
                    name: "Brickwork".to_string(),
                    unit_of_measure: "Cubic Meter".to_string(),
                    basis_quantity: 1.0,
                    sum_total: 287.5,
                    price_per_unit: 287.5,
                    ..WorkItem::default()
                },
            )
            .unwrap();

        let project_id = store.create_project("Site A").unwrap();
        let line = store.add_project_line(&project_id, "w-1", 2.0).unwrap();
        assert_eq!(line.unit_price, 287.5);
        assert_eq!(line.name, "Brickwork");

        // Duplicate insertions are distinct lines.
        let line2 = store.add_project_line(&project_id, "w-1", 1.0).unwrap();
        assert_ne!(line.instance_id, line2.instance_id);

        let project = store.project(&project_id).unwrap().unwrap();
        assert_eq!(project.items.len(), 2);
        assert_eq!(project.grand_total(), 862.5);

        store
            .set_line_quantity(&project_id, &line2.instance_id, "not a number")
            .unwrap();
        let project = store.project(&project_id).unwrap().unwrap();
        assert_eq!(project.grand_total(), 575.0);
    }

    #[test]
    fn add_project_line_requires_existing_records() {
        let store = DocumentStore::in_memory();
        let project_id = store.create_project("Site A").unwrap();
        assert!(matches!(
            store.add_project_line(&project_id, "w-9", 1.0).unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            store.add_project_line("p-9", "w-9", 1.0).unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn file_backend_round_trips_across_handles() {
        let dir = tempdir().unwrap();
        let id = {
            let store = DocumentStore::open(dir.path());
            store.create_category("Masonry").unwrap()
        };
        let store = DocumentStore::open(dir.path());
        assert_eq!(store.category(&id).unwrap().unwrap().name, "Masonry");
    }

    #[test]
    fn deleting_a_master_item_never_touches_snapshots() {
        let dir = tempdir().unwrap();
        let inventory = InventoryStore::new(dir.path());
        let master_id = inventory.create(Trade::Labor, "Mason", "PerDay", 100.0).unwrap();

        let draft = WorkItemDraft {
            name: "Brickwork".to_string(),
            unit_of_measure: "Cubic Meter".to_string(),
            basis_quantity: "1".to_string(),
            labor: vec![LineDraft::new(master_id.clone(), "2")],
            ..WorkItemDraft::default()
        };
        let catalogs = Catalogs::new(
            inventory.map_by_id(Trade::Labor).unwrap(),
            inventory.map_by_id(Trade::Material).unwrap(),
            inventory.map_by_id(Trade::Equipment).unwrap(),
        );
        let item = compute_work_item(&draft, &catalogs, None).unwrap();
        let item_id = item.id.clone();

        let store = DocumentStore::open(dir.path());
        let cat_id = store.create_category("Masonry").unwrap();
        store.add_work_item(&cat_id, item).unwrap();

        inventory.delete(Trade::Labor, &master_id).unwrap();

        let stored = store.find_work_item(&item_id).unwrap().unwrap();
        assert_eq!(stored.labor[0].unit_price, 100.0);
        assert_eq!(stored.labor[0].subtotal, 200.0);
        assert_eq!(stored.labor_total, 200.0);
    }
}
