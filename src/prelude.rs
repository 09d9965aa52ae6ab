//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the drip crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use drip::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flowchart.json")?;
//! let graph = FlowchartDocument::from_json(&json)?.into_graph()?;
//! let schedule = plan(&graph, &SystemClock)?;
//! println!("{}", schedule);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    BranchLabel, ConditionPayload, Connection, ConnectionId, DelayPayload, DelayUnit,
    GoalPayload, Graph, LeadSourcePayload, MessagePayload, Position, Predicate, Step, StepId,
    StepKind, StepPayload,
};

// Editing
pub use crate::editor::{GraphEditor, PendingInsertion};
pub use crate::history::HistoryStack;
pub use crate::routing::{LeadRef, RoutingContext};

// Planning
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::planner::{Action, PlanBranch, PlanNode, Planner, Schedule, plan};

// Wire format and adapters
pub use crate::config::DripConfig;
pub use crate::document::{FlowchartDocument, IntoGraph, ScheduleArtifact};
pub use crate::store::{CampaignRunner, Dispatcher, FlowchartStore};

// Error types
pub use crate::error::{ConversionError, EditorError, GraphError, PlanError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
