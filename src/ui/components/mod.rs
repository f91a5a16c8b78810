// UI Components
pub mod archive_table;
pub mod command_bar;
pub mod dialog;
pub mod jobs_panel;
pub mod search_bar;
pub mod status_bar;
pub mod warning;

// Re-export components for convenience
pub use archive_table::ArchiveTable;
pub use command_bar::CommandBar;
pub use dialog::{Dialog, DialogKind};
pub use jobs_panel::JobsPanel;
pub use search_bar::SearchBar;
pub use status_bar::StatusBar;
pub use warning::WarningScreen;
