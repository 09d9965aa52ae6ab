use crate::graph::{BranchLabel, Predicate, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the dispatcher should do when a plan node fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Send the message defined by a message step.
    Send {
        step_id: StepId,
        recipient: Option<String>,
    },
    /// Record that the lead reached a goal step.
    RecordGoal { step_id: StepId },
    /// Wait for the event feed to decide a condition step. The branch this
    /// action opens only continues if the condition resolves to `outcome`.
    AwaitEvent {
        step_id: StepId,
        predicate: Predicate,
        match_value: Option<String>,
        outcome: BranchLabel,
    },
}

impl Action {
    pub fn step_id(&self) -> &StepId {
        match self {
            Action::Send { step_id, .. }
            | Action::RecordGoal { step_id }
            | Action::AwaitEvent { step_id, .. } => step_id,
        }
    }
}

/// A single timed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    /// Time since the start of the run.
    pub fire_at_offset: Duration,
    /// `planned_at + fire_at_offset`.
    pub fire_at: DateTime<Utc>,
    pub action: Action,
}

/// A straight run of actions, optionally ending in a fork at a condition step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBranch {
    /// The condition outcome this branch depends on. `None` for entry branches.
    pub label: Option<BranchLabel>,
    pub actions: Vec<PlanNode>,
    pub forks: Vec<PlanBranch>,
}

impl PlanBranch {
    fn collect_actions<'a>(&'a self, out: &mut Vec<&'a PlanNode>) {
        out.extend(self.actions.iter());
        for fork in &self.forks {
            fork.collect_actions(out);
        }
    }

    fn collect_paths<'a>(
        &'a self,
        prefix: &mut Vec<&'a PlanNode>,
        out: &mut Vec<Vec<&'a PlanNode>>,
    ) {
        let depth = prefix.len();
        prefix.extend(self.actions.iter());
        if self.forks.is_empty() {
            out.push(prefix.clone());
        } else {
            for fork in &self.forks {
                fork.collect_paths(prefix, out);
            }
        }
        prefix.truncate(depth);
    }
}

/// The plan for everything reachable from one lead source step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPlan {
    pub lead_source: StepId,
    pub root: PlanBranch,
}

/// The tree of timed and event-conditioned actions derived from a graph.
///
/// A schedule holds no reference to the graph it was planned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    pub planned_at: DateTime<Utc>,
    pub entries: Vec<EntryPlan>,
}

impl Schedule {
    /// Every action, depth first, entry by entry.
    pub fn actions(&self) -> Vec<&PlanNode> {
        let mut out = Vec::new();
        for entry in &self.entries {
            entry.root.collect_actions(&mut out);
        }
        out
    }

    /// Root-to-leaf action sequences, one per possible outcome combination.
    pub fn paths(&self) -> Vec<Vec<&PlanNode>> {
        let mut out = Vec::new();
        for entry in &self.entries {
            entry.root.collect_paths(&mut Vec::new(), &mut out);
        }
        out
    }

    /// The latest offset at which anything fires.
    pub fn total_span(&self) -> Duration {
        self.actions()
            .iter()
            .map(|node| node.fire_at_offset)
            .max()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.root.actions.is_empty() && e.root.forks.is_empty())
    }
}
