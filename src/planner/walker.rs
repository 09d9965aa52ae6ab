use super::schedule::{Action, PlanBranch, PlanNode};
use crate::error::PlanError;
use crate::graph::{BranchLabel, Connection, Graph, Step, StepId, StepPayload};
use crate::routing::RoutingContext;
use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tracing::debug;

/// Walks a graph forward from an entry point, accumulating elapsed time and
/// forking at condition steps.
pub(super) struct PlanWalker<'a> {
    routing: &'a RoutingContext,
    planned_at: DateTime<Utc>,
    outgoing: AHashMap<&'a StepId, Vec<(&'a Connection, &'a Step)>>,
}

/// The steps visited on the current branch path, in order.
#[derive(Default)]
struct PathTracker<'a> {
    order: Vec<&'a StepId>,
    members: AHashSet<&'a StepId>,
}

impl<'a> PathTracker<'a> {
    fn enter(&mut self, id: &'a StepId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    fn depth(&self) -> usize {
        self.order.len()
    }

    fn rewind(&mut self, depth: usize) {
        for id in self.order.drain(depth..) {
            self.members.remove(id);
        }
    }

    fn to_vec(&self, revisited: &StepId) -> Vec<StepId> {
        self.order
            .iter()
            .map(|id| (*id).clone())
            .chain(std::iter::once(revisited.clone()))
            .collect()
    }
}

impl<'a> PlanWalker<'a> {
    pub(super) fn new(
        graph: &'a Graph,
        routing: &'a RoutingContext,
        planned_at: DateTime<Utc>,
    ) -> Self {
        let mut outgoing: AHashMap<&'a StepId, Vec<(&'a Connection, &'a Step)>> = AHashMap::new();
        for connection in graph.connections() {
            if let Some(target) = graph.step(&connection.target) {
                outgoing
                    .entry(&connection.source)
                    .or_default()
                    .push((connection, target));
            }
        }
        Self {
            routing,
            planned_at,
            outgoing,
        }
    }

    /// Plans everything reachable from a lead source step.
    pub(super) fn walk_entry(&self, entry: &'a Step) -> Result<PlanBranch, PlanError> {
        let mut path = PathTracker::default();
        self.walk_branch(entry, Duration::ZERO, None, Vec::new(), &mut path)
    }

    fn walk_branch(
        &self,
        start: &'a Step,
        mut offset: Duration,
        label: Option<BranchLabel>,
        actions: Vec<PlanNode>,
        path: &mut PathTracker<'a>,
    ) -> Result<PlanBranch, PlanError> {
        let depth = path.depth();
        let mut branch = PlanBranch {
            label,
            actions,
            forks: Vec::new(),
        };
        let mut current = Some(start);

        while let Some(step) = current.take() {
            if !path.enter(&step.id) {
                return Err(PlanError::CycleDetected {
                    step_id: step.id.clone(),
                    path: path.to_vec(&step.id),
                });
            }
            debug!(step_id = %step.id, kind = %step.kind(), ?offset, "planning step");

            let next = if step.kind().is_linear() {
                self.single_successor(step)?
            } else {
                None
            };

            match &step.payload {
                StepPayload::LeadSource(_) => {
                    current = next;
                }
                StepPayload::Message(message) => {
                    let recipient = message
                        .recipient_ref
                        .clone()
                        .or_else(|| self.routing.recipient().map(str::to_string));
                    branch.actions.push(self.node(
                        &step.id,
                        offset,
                        Action::Send {
                            step_id: step.id.clone(),
                            recipient,
                        },
                    )?);
                    current = next;
                }
                StepPayload::Delay(delay) => {
                    offset = offset
                        .checked_add(delay.duration())
                        .ok_or_else(|| PlanError::OffsetOutOfRange(step.id.clone()))?;
                    current = next;
                }
                // A goal ends its branch; a single outgoing connection is ignored.
                StepPayload::Goal(_) => {
                    branch.actions.push(self.node(
                        &step.id,
                        offset,
                        Action::RecordGoal {
                            step_id: step.id.clone(),
                        },
                    )?);
                }
                StepPayload::Condition(condition) => {
                    for outcome in BranchLabel::ORDER {
                        let Some(target) = self.labelled_successor(step, outcome) else {
                            continue;
                        };
                        let await_event = self.node(
                            &step.id,
                            offset,
                            Action::AwaitEvent {
                                step_id: step.id.clone(),
                                predicate: condition.predicate,
                                match_value: condition.match_value.clone(),
                                outcome,
                            },
                        )?;
                        let fork = self.walk_branch(
                            target,
                            offset,
                            Some(outcome),
                            vec![await_event],
                            path,
                        )?;
                        branch.forks.push(fork);
                    }
                }
            }
        }

        path.rewind(depth);
        Ok(branch)
    }

    /// The next step after a linear step, rejecting ambiguous wiring.
    fn single_successor(&self, step: &'a Step) -> Result<Option<&'a Step>, PlanError> {
        match self.outgoing.get(&step.id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([(_, target)]) => Ok(Some(*target)),
            Some(many) => Err(PlanError::MultiOutEdgeOnLinearStep {
                step_id: step.id.clone(),
                kind: step.kind(),
                count: many.len(),
            }),
        }
    }

    fn labelled_successor(&self, step: &Step, label: BranchLabel) -> Option<&'a Step> {
        self.outgoing.get(&step.id).and_then(|targets| {
            targets
                .iter()
                .find(|(connection, _)| connection.branch_label == Some(label))
                .map(|(_, target)| *target)
        })
    }

    fn node(
        &self,
        step_id: &StepId,
        offset: Duration,
        action: Action,
    ) -> Result<PlanNode, PlanError> {
        let fire_at = TimeDelta::from_std(offset)
            .ok()
            .and_then(|delta| self.planned_at.checked_add_signed(delta))
            .ok_or_else(|| PlanError::OffsetOutOfRange(step_id.clone()))?;
        Ok(PlanNode {
            fire_at_offset: offset,
            fire_at,
            action,
        })
    }
}
