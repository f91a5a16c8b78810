// Utilities
pub mod error;
pub mod glob;
pub mod natural_sort;
pub mod text;
