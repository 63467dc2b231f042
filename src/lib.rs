//! Nodle tag synchronization library
//!
//! Node types whose output ports are chosen at edit time and restored from a
//! persisted record, plus text-source nodes with submission-scoped counters,
//! running on a headless model of the Nodle editor.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod nodes;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::{Editor, Job, JobNode};
pub use error::{Result, TagSyncError};
pub use nodes::text::tag_sync::{SyncReport, TagCatalog};
