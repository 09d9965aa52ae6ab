use crate::graph::{BranchLabel, ConnectionId, StepId, StepKind};
use thiserror::Error;

/// Errors raised by structural operations on a `Graph`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(
        "Step '{missing_step_id}' not found, which is required by a connection from '{source_step_id}' to '{target_step_id}'"
    )]
    InvalidReference {
        missing_step_id: StepId,
        source_step_id: StepId,
        target_step_id: StepId,
    },

    #[error("Condition step '{step_id}' already has an outgoing '{label}' connection")]
    DuplicateBranch { step_id: StepId, label: BranchLabel },

    #[error("Connections leaving condition step '{0}' need a 'yes' or 'no' branch label")]
    MissingBranchLabel(StepId),

    #[error("Step '{0}' not found")]
    StepNotFound(StepId),

    #[error("Connection '{0}' not found")]
    ConnectionNotFound(ConnectionId),

    #[error("Step '{step_id}' is a {expected} step, but the new payload is for a {found} step")]
    PayloadKindMismatch {
        step_id: StepId,
        expected: StepKind,
        found: StepKind,
    },
}

/// Errors raised by `GraphEditor` intents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("No step choice is pending; open the step chooser first")]
    NoPendingChoice,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur while planning a schedule from a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("The graph has no lead source step to start planning from")]
    NoEntryPoint,

    #[error("Cycle detected: step '{step_id}' is revisited on path {}", format_path(.path))]
    CycleDetected { step_id: StepId, path: Vec<StepId> },

    #[error(
        "Step '{step_id}' ({kind}) has {count} outgoing connections, but only one is allowed"
    )]
    MultiOutEdgeOnLinearStep {
        step_id: StepId,
        kind: StepKind,
        count: usize,
    },

    #[error("The accumulated delay at step '{0}' is too large to schedule")]
    OffsetOutOfRange(StepId),
}

/// Errors that can occur when converting a wire document into a `Graph`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Failed to parse flowchart JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid step '{step_id}': {message}")]
    InvalidStep { step_id: String, message: String },

    #[error("Duplicate id '{0}' in flowchart document")]
    DuplicateId(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors surfaced by flowchart storage adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Flowchart '{0}' not found")]
    NotFound(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Could not (de)serialize flowchart: {0}")]
    Serialization(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Errors surfaced by dispatch adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Dispatch rejected: {0}")]
    Rejected(String),

    #[error("Dispatcher unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by `CampaignRunner::run`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Errors from saving or loading a planned schedule artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact error: {0}")]
    Generic(String),
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Config parse error: {0}")]
    Parse(String),
}

fn format_path(path: &[StepId]) -> String {
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
