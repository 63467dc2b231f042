//! File management for saved workflows
//!
//! Handles saving, loading, and file state management for node graphs.

use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::nodes::NodeGraph;

/// Save file data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: String,
    pub metadata: SaveMetadata,
    pub root_graph: NodeGraph,
}

/// Metadata for save files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub created: String,    // ISO 8601 timestamp
    pub modified: String,   // ISO 8601 timestamp
    pub creator: String,
    pub description: String,
}

impl SaveData {
    pub fn new(graph: &NodeGraph) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            metadata: SaveMetadata {
                created: now.clone(),
                modified: now,
                creator: format!("Nōdle tagsync {}", env!("CARGO_PKG_VERSION")),
                description: "Node graph created with Nōdle".to_string(),
            },
            root_graph: graph.clone(),
        }
    }
}

/// Manages file operations for the editor
#[derive(Debug, Default)]
pub struct FileManager {
    /// Current file path (None if unsaved/new file)
    current_file_path: Option<PathBuf>,
    /// Whether the file has been modified since last save
    is_modified: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_file_path(&self) -> Option<&PathBuf> {
        self.current_file_path.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.is_modified
    }

    pub fn mark_modified(&mut self) {
        self.is_modified = true;
    }

    /// Get display name for the current file
    pub fn get_file_display_name(&self) -> String {
        let name = self
            .current_file_path
            .as_ref()
            .and_then(|path| path.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled");

        if self.is_modified {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    /// Save the graph to a file, keeping the original creation time when re-saving
    pub fn save_to_file(&mut self, file_path: &Path, graph: &NodeGraph, previous: Option<&SaveMetadata>) -> Result<()> {
        let mut save_data = SaveData::new(graph);
        if let Some(previous) = previous {
            save_data.metadata.created = previous.created.clone();
        }

        let json_content = serde_json::to_string_pretty(&save_data)?;
        std::fs::write(file_path, json_content)?;

        self.current_file_path = Some(file_path.to_path_buf());
        self.is_modified = false;
        info!("Saved workflow to {}", file_path.display());
        Ok(())
    }

    /// Load a saved workflow
    pub fn load_from_file(&mut self, file_path: &Path) -> Result<SaveData> {
        let json_content = std::fs::read_to_string(file_path)?;
        let save_data: SaveData = serde_json::from_str(&json_content)?;

        self.current_file_path = Some(file_path.to_path_buf());
        self.is_modified = false;
        info!(
            "Loaded workflow {} ({} nodes)",
            file_path.display(),
            save_data.root_graph.nodes.len()
        );
        Ok(save_data)
    }
}
