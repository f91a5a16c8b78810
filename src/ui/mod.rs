// UI Layer
pub mod components;
pub mod layout;
pub mod theme;

pub use layout::{calculate_areas, LayoutMode};
pub use theme::Theme;

pub use components::{
    ArchiveTable, CommandBar, Dialog, DialogKind, JobsPanel, SearchBar, StatusBar, WarningScreen,
};
