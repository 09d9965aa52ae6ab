use super::{ConnectionId, StepId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distinguishes the two outgoing paths of a condition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchLabel {
    Yes,
    No,
}

impl BranchLabel {
    /// Fork order used by the planner.
    pub const ORDER: [BranchLabel; 2] = [BranchLabel::Yes, BranchLabel::No];
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchLabel::Yes => f.write_str("yes"),
            BranchLabel::No => f.write_str("no"),
        }
    }
}

/// A directed edge between two steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: StepId,
    pub target: StepId,
    pub branch_label: Option<BranchLabel>,
}

impl Connection {
    pub fn touches(&self, step_id: &StepId) -> bool {
        &self.source == step_id || &self.target == step_id
    }
}
