use crate::graph::{BranchLabel, Position, StepKind};
use crate::routing::LeadRef;
use serde::{Deserialize, Deserializer, Serialize};

/// The stored and transported shape of a flowchart.
///
/// Field names follow the editor front end; older documents using
/// `type`/`data` for steps and `source`/`target`/`sourceHandle` for
/// connections are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<StepDefinition>,
    #[serde(default)]
    pub edges: Vec<ConnectionDefinition>,
    #[serde(default)]
    pub lead_sources: Vec<LeadRef>,
}

/// A single step. `payload` is interpreted according to `kind`; fields that do
/// not belong to the kind are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: StepKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default, alias = "data")]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "source")]
    pub source_step_id: String,
    #[serde(alias = "target")]
    pub target_step_id: String,
    #[serde(
        default,
        alias = "sourceHandle",
        deserialize_with = "deserialize_branch_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub branch_label: Option<BranchLabel>,
}

/// Handles other than "yes"/"no" (or null) carry no branch meaning.
fn deserialize_branch_label<'de, D>(deserializer: D) -> Result<Option<BranchLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        Some("yes") => Some(BranchLabel::Yes),
        Some("no") => Some(BranchLabel::No),
        _ => None,
    })
}
