use super::definition::{ConnectionDefinition, FlowchartDocument, StepDefinition};
use crate::error::ConversionError;
use crate::graph::{
    ConditionPayload, Connection, ConnectionId, DelayPayload, GoalPayload, Graph,
    LeadSourcePayload, MessagePayload, Step, StepId, StepKind, StepPayload,
};
use ahash::AHashSet;
use serde::de::DeserializeOwned;

/// A trait for data models that can be converted into a `Graph`.
///
/// This is the extension point for loading campaigns from formats other than
/// `FlowchartDocument`.
///
/// # Example
///
/// ```rust,no_run
/// use drip::document::IntoGraph;
/// use drip::error::ConversionError;
/// use drip::graph::{Graph, GoalPayload, Position, StepPayload};
///
/// struct Checklist { goals: Vec<String> }
///
/// impl IntoGraph for Checklist {
///     fn into_graph(self) -> Result<Graph, ConversionError> {
///         let mut graph = Graph::new("checklist");
///         for (i, name) in self.goals.into_iter().enumerate() {
///             let payload = StepPayload::Goal(GoalPayload { name, description: String::new() });
///             graph.add_step(payload, Position::new(0.0, i as f64 * 100.0));
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a validated graph.
    fn into_graph(self) -> Result<Graph, ConversionError>;
}

impl IntoGraph for FlowchartDocument {
    fn into_graph(self) -> Result<Graph, ConversionError> {
        let mut graph = Graph::new(self.name);
        graph.set_lead_sources(self.lead_sources);

        let mut seen_steps = AHashSet::new();
        for definition in self.nodes {
            if !seen_steps.insert(definition.id.clone()) {
                return Err(ConversionError::DuplicateId(definition.id));
            }
            graph.insert_step(parse_step(definition)?);
        }

        let mut seen_edges = AHashSet::new();
        let mut unnamed = Vec::new();
        for definition in self.edges {
            let source = StepId::new(definition.source_step_id);
            let target = StepId::new(definition.target_step_id);
            match definition.id {
                Some(id) => {
                    if !seen_edges.insert(id.clone()) {
                        return Err(ConversionError::DuplicateId(id));
                    }
                    graph.insert_connection(Connection {
                        id: ConnectionId::new(id),
                        source,
                        target,
                        branch_label: definition.branch_label,
                    })?;
                }
                None => unnamed.push((source, target, definition.branch_label)),
            }
        }
        // Unnamed edges get generated ids once every named one has been seen.
        for (source, target, branch_label) in unnamed {
            graph.add_connection(&source, &target, branch_label)?;
        }

        graph.validate()?;
        Ok(graph)
    }
}

impl FlowchartDocument {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConversionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }

    /// The document describing `graph`, steps and connections in id order.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .steps()
            .map(|step| StepDefinition {
                id: step.id.to_string(),
                kind: step.kind(),
                position: step.position,
                payload: payload_to_value(&step.payload),
            })
            .collect();
        let edges = graph
            .connections()
            .map(|connection| ConnectionDefinition {
                id: Some(connection.id.to_string()),
                source_step_id: connection.source.to_string(),
                target_step_id: connection.target.to_string(),
                branch_label: connection.branch_label,
            })
            .collect();
        Self {
            name: graph.name().to_string(),
            nodes,
            edges,
            lead_sources: graph.lead_sources().to_vec(),
        }
    }
}

fn parse_step(definition: StepDefinition) -> Result<Step, ConversionError> {
    let StepDefinition {
        id,
        kind,
        position,
        payload,
    } = definition;
    let payload = match payload {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    let payload = match kind {
        StepKind::LeadSource => {
            StepPayload::LeadSource(parse_payload::<LeadSourcePayload>(&id, payload)?)
        }
        StepKind::Message => StepPayload::Message(parse_payload::<MessagePayload>(&id, payload)?),
        StepKind::Delay => StepPayload::Delay(parse_payload::<DelayPayload>(&id, payload)?),
        StepKind::Condition => {
            StepPayload::Condition(parse_payload::<ConditionPayload>(&id, payload)?.normalized())
        }
        StepKind::Goal => StepPayload::Goal(parse_payload::<GoalPayload>(&id, payload)?),
    };
    Ok(Step {
        id: StepId::new(id),
        position,
        payload,
    })
}

fn parse_payload<T: DeserializeOwned>(
    step_id: &str,
    value: serde_json::Value,
) -> Result<T, ConversionError> {
    serde_json::from_value(value).map_err(|e| ConversionError::InvalidStep {
        step_id: step_id.to_string(),
        message: e.to_string(),
    })
}

fn payload_to_value(payload: &StepPayload) -> serde_json::Value {
    // Payload structs only hold strings, numbers and enums, which always serialize.
    let value = match payload {
        StepPayload::LeadSource(p) => serde_json::to_value(p),
        StepPayload::Message(p) => serde_json::to_value(p),
        StepPayload::Delay(p) => serde_json::to_value(p),
        StepPayload::Condition(p) => serde_json::to_value(p),
        StepPayload::Goal(p) => serde_json::to_value(p),
    };
    value.unwrap_or_default()
}
