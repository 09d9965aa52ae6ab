use crate::config::{DripConfig, LayoutConfig};
use crate::error::{EditorError, GraphError};
use crate::graph::{BranchLabel, ConnectionId, Graph, Position, StepId, StepKind, StepPayload};
use crate::history::HistoryStack;
use crate::routing::{LeadRef, RoutingContext};
use tracing::{debug, info};

mod catalog;
mod defaults;
pub mod layout;
mod pending;

pub use catalog::{CatalogEntry, STEP_CATALOG, search_step_kinds};
pub use defaults::default_payload;
pub use pending::PendingInsertion;

/// Owns the live graph of one editing session and applies operator intents to
/// it.
///
/// Every successful mutation records exactly one history entry; a failed one
/// leaves both the graph and the history untouched. Mutations are applied to a
/// staged copy first and only swapped in once they succeed.
pub struct GraphEditor {
    graph: Graph,
    history: HistoryStack,
    pending: PendingInsertion,
    layout: LayoutConfig,
}

pub struct EditorBuilder {
    graph: Graph,
    layout: LayoutConfig,
    max_history: Option<usize>,
}

impl EditorBuilder {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            layout: LayoutConfig::default(),
            max_history: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_history_limit(mut self, max_entries: Option<usize>) -> Self {
        self.max_history = max_entries;
        self
    }

    pub fn with_config(self, config: &DripConfig) -> Self {
        self.with_layout(config.layout.clone())
            .with_history_limit(config.history.max_entries)
    }

    pub fn build(self) -> GraphEditor {
        let history = HistoryStack::new(&self.graph).with_max_entries(self.max_history);
        GraphEditor {
            graph: self.graph,
            history,
            pending: PendingInsertion::Idle,
            layout: self.layout,
        }
    }
}

impl GraphEditor {
    pub fn builder(graph: Graph) -> EditorBuilder {
        EditorBuilder::new(graph)
    }

    /// An editor over `graph` with default layout and unbounded history.
    pub fn new(graph: Graph) -> Self {
        EditorBuilder::new(graph).build()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn pending(&self) -> &PendingInsertion {
        &self.pending
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replaces the session's graph, e.g. after loading from storage. History
    /// restarts from the loaded graph.
    pub fn load(&mut self, graph: Graph) {
        self.graph = graph;
        self.history.reset(&self.graph);
        self.pending = PendingInsertion::Idle;
    }

    /// Opens the chooser for the first step of the graph. Requires a routing
    /// recipient, because new message and lead source steps are addressed to it.
    /// Without an anchor the configured default anchor is used.
    pub fn begin_add_first_step(
        &mut self,
        anchor: Option<Position>,
        routing: &RoutingContext,
    ) -> Result<(), EditorError> {
        if !routing.has_recipient() {
            return Err(EditorError::PreconditionFailed(
                "a recipient must be configured before adding the first step".to_string(),
            ));
        }
        self.open_chooser(PendingInsertion::AwaitingStepChoice {
            anchor: anchor.unwrap_or(self.layout.first_anchor),
            origin: None,
            branch_label: None,
        });
        Ok(())
    }

    /// Opens the chooser for a step that will follow `origin`.
    pub fn begin_add_step_from(
        &mut self,
        origin: &StepId,
        anchor: Position,
        branch_label: Option<BranchLabel>,
    ) -> Result<(), EditorError> {
        let origin_step = self
            .graph
            .step(origin)
            .ok_or_else(|| GraphError::StepNotFound(origin.clone()))?;

        let branch_label = if origin_step.kind() == StepKind::Condition {
            let label =
                branch_label.ok_or_else(|| GraphError::MissingBranchLabel(origin.clone()))?;
            if !self.graph.outgoing(origin, Some(label)).is_empty() {
                return Err(GraphError::DuplicateBranch {
                    step_id: origin.clone(),
                    label,
                }
                .into());
            }
            Some(label)
        } else {
            None
        };

        self.open_chooser(PendingInsertion::AwaitingStepChoice {
            anchor,
            origin: Some(origin.clone()),
            branch_label,
        });
        Ok(())
    }

    /// Completes the pending insertion with a step of `kind`.
    ///
    /// The pending state is consumed whether or not the insertion succeeds.
    pub fn choose_step_kind(
        &mut self,
        kind: StepKind,
        routing: &RoutingContext,
    ) -> Result<StepId, EditorError> {
        let PendingInsertion::AwaitingStepChoice {
            anchor,
            origin,
            branch_label,
        } = self.pending.take()
        else {
            return Err(EditorError::NoPendingChoice);
        };

        let payload = default_payload(kind, routing);
        let placement = self.layout.clone();
        let new_id = self.apply(|graph| match origin {
            None => Ok(graph.add_step(payload, anchor)),
            Some(origin) => {
                let origin_position = graph
                    .step(&origin)
                    .map(|s| s.position)
                    .ok_or_else(|| GraphError::StepNotFound(origin.clone()))?;
                let position = layout::place_after(origin_position, branch_label, &placement);
                let new_id = graph.add_step(payload, position);
                graph.add_connection(&origin, &new_id, branch_label)?;
                Ok(new_id)
            }
        })?;
        info!(step_id = %new_id, %kind, "inserted step");
        Ok(new_id)
    }

    /// Closes the chooser without touching the graph. Returns whether a choice
    /// was pending.
    pub fn cancel_pending_choice(&mut self) -> bool {
        let was_pending = !self.pending.take().is_idle();
        if was_pending {
            debug!("step choice cancelled");
        }
        was_pending
    }

    /// Wires two existing steps together.
    pub fn connect(
        &mut self,
        source: &StepId,
        target: &StepId,
        branch_label: Option<BranchLabel>,
    ) -> Result<ConnectionId, EditorError> {
        self.apply(|graph| graph.add_connection(source, target, branch_label))
    }

    pub fn delete_step(&mut self, id: &StepId) -> Result<(), EditorError> {
        self.apply(|graph| graph.remove_step(id).map(|_| ()))
    }

    pub fn delete_connection(&mut self, id: &ConnectionId) -> Result<(), EditorError> {
        self.apply(|graph| graph.remove_connection(id).map(|_| ()))
    }

    /// Copies a step's payload into a new, unconnected step placed diagonally
    /// next to it.
    pub fn duplicate_step(&mut self, id: &StepId) -> Result<StepId, EditorError> {
        let placement = self.layout.clone();
        self.apply(|graph| {
            let original = graph
                .step(id)
                .ok_or_else(|| GraphError::StepNotFound(id.clone()))?;
            let position = layout::place_duplicate(original.position, &placement);
            let payload = original.payload.clone();
            Ok(graph.add_step(payload, position))
        })
    }

    /// Replaces a step's payload with a new value of the same kind.
    pub fn update_payload(&mut self, id: &StepId, payload: StepPayload) -> Result<(), EditorError> {
        self.apply(|graph| graph.replace_payload(id, payload).map(|_| ()))
    }

    pub fn move_step(&mut self, id: &StepId, position: Position) -> Result<(), EditorError> {
        self.apply(|graph| graph.move_step(id, position))
    }

    /// Renames the graph. Renaming to the current name records nothing.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.graph.name() == name {
            return;
        }
        self.commit(|graph| graph.set_name(name));
    }

    pub fn set_lead_sources(&mut self, lead_sources: Vec<LeadRef>) {
        if self.graph.lead_sources() == lead_sources.as_slice() {
            return;
        }
        self.commit(|graph| graph.set_lead_sources(lead_sources));
    }

    /// Restores the previous snapshot. Returns `false` at the oldest snapshot.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.graph.restore_from(snapshot);
        self.cancel_pending_choice();
        debug!(index = self.history.index(), "undo");
        true
    }

    /// Re-applies the next snapshot. Returns `false` at the newest snapshot.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.graph.restore_from(snapshot);
        self.cancel_pending_choice();
        debug!(index = self.history.index(), "redo");
        true
    }

    fn open_chooser(&mut self, state: PendingInsertion) {
        if !self.pending.is_idle() {
            debug!("replacing an open step chooser");
        }
        self.pending = state;
    }

    /// Runs `mutation` against a staged copy of the graph and commits it to the
    /// live graph and the history only if it succeeds.
    fn apply<T>(
        &mut self,
        mutation: impl FnOnce(&mut Graph) -> Result<T, GraphError>,
    ) -> Result<T, EditorError> {
        let mut staged = self.graph.clone();
        let output = mutation(&mut staged)?;
        self.history.snapshot(&staged);
        self.graph = staged;
        Ok(output)
    }

    /// Applies a mutation that cannot fail and records it.
    fn commit(&mut self, mutation: impl FnOnce(&mut Graph)) {
        mutation(&mut self.graph);
        self.history.snapshot(&self.graph);
    }
}
