// System Layer
pub mod catalog;
pub mod extract;
pub mod metadata;
pub mod opener;
pub mod scheduler;

pub use catalog::{scan, CatalogScan};
pub use opener::open_folder;
pub use scheduler::{ExtractionScheduler, SchedulerEvent};
