use super::{FlowchartStore, FlowchartSummary, StoredFlowchart, new_flowchart_id};
use crate::document::FlowchartDocument;
use crate::error::StoreError;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Stores each flowchart as a pretty-printed JSON file named `<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Opens (and creates, if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Io(format!("Could not create store directory '{}': {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        // Ids become file names; anything path-like would escape the directory.
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn read(&self, path: &Path) -> Result<StoredFlowchart, StoreError> {
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::Io(format!("Could not read '{}': {}", path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write(&self, stored: &StoredFlowchart) -> Result<(), StoreError> {
        let path = self.path_for(&stored.id)?;
        let json = serde_json::to_string_pretty(stored)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StoreError::Io(format!("Could not write '{}': {}", path.display(), e)))
    }
}

impl FlowchartStore for JsonDirStore {
    fn load(&self, id: &str) -> Result<FlowchartDocument, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(path = %path.display(), "loading flowchart");
        Ok(self.read(&path)?.document)
    }

    fn save(
        &mut self,
        document: &FlowchartDocument,
        id: Option<&str>,
    ) -> Result<String, StoreError> {
        let stored = match id {
            Some(id) => {
                let path = self.path_for(id)?;
                if !path.exists() {
                    return Err(StoreError::NotFound(id.to_string()));
                }
                StoredFlowchart {
                    document: document.clone(),
                    ..self.read(&path)?
                }
            }
            None => StoredFlowchart {
                id: new_flowchart_id(),
                created_at: Utc::now(),
                document: document.clone(),
            },
        };
        self.write(&stored)?;
        info!(id = %stored.id, name = %stored.document.name, "saved flowchart");
        Ok(stored.id)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(&path)
            .map_err(|e| StoreError::Io(format!("Could not delete '{}': {}", path.display(), e)))
    }

    fn list(&self) -> Result<Vec<FlowchartSummary>, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            StoreError::Io(format!("Could not list '{}': {}", self.dir.display(), e))
        })?;
        let mut summaries = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::Io(e.to_string()))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                summaries.push(self.read(&path)?.summary());
            }
        }
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }
}
