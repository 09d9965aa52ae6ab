//! Boundaries to the outside world: where flowcharts are stored and where
//! planned schedules are handed off for delivery.
//!
//! The editing and planning core never calls these traits itself; the
//! surrounding application (or `CampaignRunner`) does.

use crate::document::FlowchartDocument;
use crate::error::{DispatchError, StoreError};
use crate::planner::Schedule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod json_dir;
mod memory;
mod runner;

pub use json_dir::JsonDirStore;
pub use memory::{LogDispatcher, MemoryStore, RecordingDispatcher};
pub use runner::CampaignRunner;

/// Listing entry for a stored flowchart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A flowchart as kept by a store: the document plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFlowchart {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub document: FlowchartDocument,
}

impl StoredFlowchart {
    pub fn summary(&self) -> FlowchartSummary {
        FlowchartSummary {
            id: self.id.clone(),
            name: self.document.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Persistence for flowchart documents.
pub trait FlowchartStore {
    fn load(&self, id: &str) -> Result<FlowchartDocument, StoreError>;

    /// Creates a new flowchart when `id` is `None` and returns its fresh id;
    /// otherwise updates the existing one.
    fn save(
        &mut self,
        document: &FlowchartDocument,
        id: Option<&str>,
    ) -> Result<String, StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    fn list(&self) -> Result<Vec<FlowchartSummary>, StoreError>;
}

/// The payload handed to a dispatcher when a campaign is run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub flowchart_id: String,
    #[serde(flatten)]
    pub flowchart: FlowchartDocument,
    pub schedule: Schedule,
}

/// Hands a planned schedule to whatever delivers it. Delivery outcomes are
/// not reported back.
pub trait Dispatcher {
    fn dispatch(&mut self, request: &RunRequest) -> Result<(), DispatchError>;
}

pub(crate) fn new_flowchart_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
