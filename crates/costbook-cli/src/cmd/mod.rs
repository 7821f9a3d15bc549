pub mod category;
pub mod completions;
pub mod inventory;
pub mod item;
pub mod project;
