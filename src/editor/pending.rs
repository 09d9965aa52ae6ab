use crate::graph::{BranchLabel, Position, StepId};

/// The transient state of the two-phase "open chooser, then pick a kind"
/// interaction. Choosing, cancelling, clicking away and keyboard interruption
/// all end in `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PendingInsertion {
    #[default]
    Idle,
    AwaitingStepChoice {
        anchor: Position,
        origin: Option<StepId>,
        branch_label: Option<BranchLabel>,
    },
}

impl PendingInsertion {
    pub fn is_idle(&self) -> bool {
        matches!(self, PendingInsertion::Idle)
    }

    /// Where the chooser is shown, if it is open.
    pub fn anchor(&self) -> Option<Position> {
        match self {
            PendingInsertion::Idle => None,
            PendingInsertion::AwaitingStepChoice { anchor, .. } => Some(*anchor),
        }
    }

    pub fn origin(&self) -> Option<&StepId> {
        match self {
            PendingInsertion::AwaitingStepChoice {
                origin: Some(origin),
                ..
            } => Some(origin),
            _ => None,
        }
    }

    /// Moves the state out, leaving `Idle` behind.
    pub fn take(&mut self) -> PendingInsertion {
        std::mem::take(self)
    }
}
