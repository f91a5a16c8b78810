// Data Models
pub mod archive_record;
pub mod extraction;

pub use archive_record::{is_plain_name, ArchiveRecord, Catalog, MetadataStatus};
pub use extraction::{ExtractionJob, ExtractionSummary, JobId, JobState, ProgressEvent};
