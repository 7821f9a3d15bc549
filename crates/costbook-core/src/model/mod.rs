//! Persisted record types: master catalog entries, work items, projects.

mod master;
mod project;
mod trade;
mod work_item;

pub use master::MasterItem;
pub use project::{Project, ProjectLine};
pub use trade::{ParseTradeError, Trade};
pub use work_item::{Category, WorkItem, WorkItemLine};
