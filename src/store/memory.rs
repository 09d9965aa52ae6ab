use super::{
    Dispatcher, FlowchartStore, FlowchartSummary, RunRequest, StoredFlowchart, new_flowchart_id,
};
use crate::document::FlowchartDocument;
use crate::error::{DispatchError, StoreError};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

/// A store that keeps flowcharts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    flowcharts: BTreeMap<String, StoredFlowchart>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flowcharts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowcharts.is_empty()
    }
}

impl FlowchartStore for MemoryStore {
    fn load(&self, id: &str) -> Result<FlowchartDocument, StoreError> {
        self.flowcharts
            .get(id)
            .map(|stored| stored.document.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn save(
        &mut self,
        document: &FlowchartDocument,
        id: Option<&str>,
    ) -> Result<String, StoreError> {
        match id {
            Some(id) => {
                let stored = self
                    .flowcharts
                    .get_mut(id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                stored.document = document.clone();
                Ok(id.to_string())
            }
            None => {
                let id = new_flowchart_id();
                self.flowcharts.insert(
                    id.clone(),
                    StoredFlowchart {
                        id: id.clone(),
                        created_at: Utc::now(),
                        document: document.clone(),
                    },
                );
                Ok(id)
            }
        }
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.flowcharts
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<FlowchartSummary>, StoreError> {
        let mut summaries: Vec<_> = self
            .flowcharts
            .values()
            .map(StoredFlowchart::summary)
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }
}

/// Keeps every dispatched request, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    pub requests: Vec<RunRequest>,
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&mut self, request: &RunRequest) -> Result<(), DispatchError> {
        self.requests.push(request.clone());
        Ok(())
    }
}

/// Logs each dispatched schedule instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn dispatch(&mut self, request: &RunRequest) -> Result<(), DispatchError> {
        info!(
            flowchart_id = %request.flowchart_id,
            actions = request.schedule.actions().len(),
            "dispatching schedule"
        );
        for node in request.schedule.actions() {
            info!(fire_at = %node.fire_at.to_rfc3339(), action = ?node.action, "planned action");
        }
        Ok(())
    }
}
