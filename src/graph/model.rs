use super::{
    BranchLabel, Connection, ConnectionId, IdSequence, Position, Step, StepId, StepKind,
    StepPayload,
};
use crate::error::GraphError;
use crate::routing::LeadRef;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// In-memory campaign graph: typed steps wired together by connections.
///
/// Every mutation keeps the structural invariants intact: connections always
/// reference existing steps, a condition step uses each branch label at most
/// once, and removing a step removes every connection touching it. Steps and
/// connections are kept in ordered maps so iteration (and therefore
/// serialization and planning) is stable.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    name: String,
    steps: BTreeMap<StepId, Step>,
    connections: BTreeMap<ConnectionId, Connection>,
    lead_sources: Vec<LeadRef>,
    ids: IdSequence,
}

/// Structural equality. The id sequence is bookkeeping and is ignored.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.steps == other.steps
            && self.connections == other.connections
            && self.lead_sources == other.lead_sources
    }
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn lead_sources(&self) -> &[LeadRef] {
        &self.lead_sources
    }

    pub fn set_lead_sources(&mut self, lead_sources: Vec<LeadRef>) {
        self.lead_sources = lead_sources;
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.get(id)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn contains_step(&self, id: &StepId) -> bool {
        self.steps.contains_key(id)
    }

    /// All lead source steps, in id order.
    pub fn entry_points(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .values()
            .filter(|s| s.kind() == StepKind::LeadSource)
    }

    pub fn add_step(&mut self, payload: StepPayload, position: Position) -> StepId {
        let id = self.ids.next_step_id();
        debug!(step_id = %id, kind = %payload.kind(), "adding step");
        self.steps.insert(
            id.clone(),
            Step {
                id: id.clone(),
                position,
                payload,
            },
        );
        id
    }

    /// Inserts a step that already carries an id, e.g. one read from storage.
    /// An existing step with the same id is replaced.
    pub fn insert_step(&mut self, step: Step) {
        self.ids.observe_step(&step.id);
        self.steps.insert(step.id.clone(), step);
    }

    pub fn add_connection(
        &mut self,
        source: &StepId,
        target: &StepId,
        branch_label: Option<BranchLabel>,
    ) -> Result<ConnectionId, GraphError> {
        let branch_label = self.check_connection(source, target, branch_label)?;
        let id = self.ids.next_connection_id();
        debug!(connection_id = %id, %source, %target, ?branch_label, "adding connection");
        self.connections.insert(
            id.clone(),
            Connection {
                id: id.clone(),
                source: source.clone(),
                target: target.clone(),
                branch_label,
            },
        );
        Ok(id)
    }

    /// Inserts a connection that already carries an id, enforcing the same rules
    /// as `add_connection`.
    pub fn insert_connection(&mut self, connection: Connection) -> Result<(), GraphError> {
        let branch_label = self.check_connection(
            &connection.source,
            &connection.target,
            connection.branch_label,
        )?;
        self.ids.observe_connection(&connection.id);
        self.connections.insert(
            connection.id.clone(),
            Connection {
                branch_label,
                ..connection
            },
        );
        Ok(())
    }

    /// Checks whether a connection could be added without changing the graph.
    ///
    /// Returns the label the connection would carry: labels only mean something
    /// on condition steps and are dropped everywhere else.
    pub fn check_connection(
        &self,
        source: &StepId,
        target: &StepId,
        branch_label: Option<BranchLabel>,
    ) -> Result<Option<BranchLabel>, GraphError> {
        let source_step = self.steps.get(source).ok_or_else(|| GraphError::InvalidReference {
            missing_step_id: source.clone(),
            source_step_id: source.clone(),
            target_step_id: target.clone(),
        })?;
        if !self.steps.contains_key(target) {
            return Err(GraphError::InvalidReference {
                missing_step_id: target.clone(),
                source_step_id: source.clone(),
                target_step_id: target.clone(),
            });
        }

        if source_step.kind() != StepKind::Condition {
            if let Some(label) = branch_label {
                warn!(%source, %label, "dropping branch label on a non-condition step");
            }
            return Ok(None);
        }

        let label = branch_label.ok_or_else(|| GraphError::MissingBranchLabel(source.clone()))?;
        if !self.outgoing(source, Some(label)).is_empty() {
            return Err(GraphError::DuplicateBranch {
                step_id: source.clone(),
                label,
            });
        }
        Ok(Some(label))
    }

    /// Removes a step together with every connection touching it.
    pub fn remove_step(&mut self, id: &StepId) -> Result<Step, GraphError> {
        let step = self
            .steps
            .remove(id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
        let before = self.connections.len();
        self.connections.retain(|_, c| !c.touches(id));
        debug!(
            step_id = %id,
            removed_connections = before - self.connections.len(),
            "removed step"
        );
        Ok(step)
    }

    pub fn remove_connection(&mut self, id: &ConnectionId) -> Result<Connection, GraphError> {
        self.connections
            .remove(id)
            .ok_or_else(|| GraphError::ConnectionNotFound(id.clone()))
    }

    /// Outgoing connections of a step. With a label, only connections carrying
    /// that label match; without one, every outgoing connection does.
    pub fn outgoing(
        &self,
        step_id: &StepId,
        branch_label: Option<BranchLabel>,
    ) -> Vec<&Connection> {
        self.connections
            .values()
            .filter(|c| &c.source == step_id)
            .filter(|c| branch_label.is_none() || c.branch_label == branch_label)
            .collect()
    }

    pub fn incoming(&self, step_id: &StepId) -> Vec<&Connection> {
        self.connections
            .values()
            .filter(|c| &c.target == step_id)
            .collect()
    }

    /// Swaps in a new payload value, returning the previous one.
    pub fn replace_payload(
        &mut self,
        id: &StepId,
        payload: StepPayload,
    ) -> Result<StepPayload, GraphError> {
        let step = self
            .steps
            .get_mut(id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
        if step.kind() != payload.kind() {
            return Err(GraphError::PayloadKindMismatch {
                step_id: id.clone(),
                expected: step.kind(),
                found: payload.kind(),
            });
        }
        Ok(std::mem::replace(&mut step.payload, payload))
    }

    pub fn move_step(&mut self, id: &StepId, position: Position) -> Result<(), GraphError> {
        let step = self
            .steps
            .get_mut(id)
            .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
        step.position = position;
        Ok(())
    }

    /// Re-checks every structural invariant.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut used_labels = std::collections::BTreeSet::new();
        for connection in self.connections.values() {
            for endpoint in [&connection.source, &connection.target] {
                if !self.steps.contains_key(endpoint) {
                    return Err(GraphError::InvalidReference {
                        missing_step_id: endpoint.clone(),
                        source_step_id: connection.source.clone(),
                        target_step_id: connection.target.clone(),
                    });
                }
            }
            if self.steps[&connection.source].kind() == StepKind::Condition {
                let label = connection
                    .branch_label
                    .ok_or_else(|| GraphError::MissingBranchLabel(connection.source.clone()))?;
                if !used_labels.insert((connection.source.clone(), label)) {
                    return Err(GraphError::DuplicateBranch {
                        step_id: connection.source.clone(),
                        label,
                    });
                }
            }
        }
        Ok(())
    }

    /// Replaces the contents with a snapshot while keeping the id sequence
    /// moving forward, so ids handed out before are never generated again.
    pub fn restore_from(&mut self, snapshot: &Graph) {
        let ids = self.ids.merge(snapshot.ids);
        *self = snapshot.clone();
        self.ids = ids;
    }
}
