use super::StepId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

/// The type of a step in a campaign graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    LeadSource,
    #[serde(alias = "coldEmail")]
    Message,
    Delay,
    #[serde(alias = "conditionNode")]
    Condition,
    #[serde(alias = "goalNode")]
    Goal,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::Message,
        StepKind::Delay,
        StepKind::LeadSource,
        StepKind::Condition,
        StepKind::Goal,
    ];

    /// Whether the step may have at most one outgoing connection. Only
    /// condition steps fork.
    pub fn is_linear(self) -> bool {
        self != StepKind::Condition
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::LeadSource => "lead source",
            StepKind::Message => "message",
            StepKind::Delay => "delay",
            StepKind::Condition => "condition",
            StepKind::Goal => "goal",
        };
        f.write_str(name)
    }
}

/// Layout hint for a step. Never consulted by planning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(alias = "recipient", skip_serializing_if = "Option::is_none")]
    pub recipient_ref: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadSourcePayload {
    #[serde(alias = "recipient", skip_serializing_if = "Option::is_none")]
    pub recipient_ref: Option<String>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalPayload {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DelayUnit {
    Minutes,
    Hours,
    #[default]
    Days,
    Weeks,
}

impl DelayUnit {
    pub fn seconds(self) -> u64 {
        match self {
            DelayUnit::Minutes => 60,
            DelayUnit::Hours => 60 * 60,
            DelayUnit::Days => 24 * 60 * 60,
            DelayUnit::Weeks => 7 * 24 * 60 * 60,
        }
    }
}

impl fmt::Display for DelayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DelayUnit::Minutes => "minutes",
            DelayUnit::Hours => "hours",
            DelayUnit::Days => "days",
            DelayUnit::Weeks => "weeks",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayPayload {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: NonZeroU32,
    pub unit: DelayUnit,
}

impl Default for DelayPayload {
    fn default() -> Self {
        Self {
            amount: NonZeroU32::MIN,
            unit: DelayUnit::Days,
        }
    }
}

impl DelayPayload {
    pub fn new(amount: NonZeroU32, unit: DelayUnit) -> Self {
        Self { amount, unit }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.amount.get()) * self.unit.seconds())
    }
}

impl fmt::Display for DelayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wait {} {}", self.amount, self.unit)
    }
}

/// Delay amounts arrive either as numbers or as numeric strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<NonZeroU32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(u64),
        Text(String),
    }

    let raw = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().parse::<u64>().map_err(|_| {
            serde::de::Error::custom(format!("delay amount '{}' is not a whole number", s))
        })?,
    };
    u32::try_from(raw)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| {
            serde::de::Error::custom(format!(
                "delay amount must be a positive integer, got {}",
                raw
            ))
        })
}

/// The engagement event a condition step waits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    #[default]
    Opened,
    Clicked,
    Replied,
    NotOpened,
    NotClicked,
}

impl Predicate {
    /// Link predicates may narrow the match to links containing a substring.
    pub fn uses_link_match(self) -> bool {
        matches!(self, Predicate::Clicked | Predicate::NotClicked)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Predicate::Opened => "opened",
            Predicate::Clicked => "clicked",
            Predicate::Replied => "replied",
            Predicate::NotOpened => "notOpened",
            Predicate::NotClicked => "notClicked",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionPayload {
    #[serde(alias = "type")]
    pub predicate: Predicate,
    #[serde(alias = "value", skip_serializing_if = "Option::is_none")]
    pub match_value: Option<String>,
}

impl ConditionPayload {
    /// Builds a condition, keeping `match_value` only for link predicates.
    pub fn new(predicate: Predicate, match_value: Option<String>) -> Self {
        let match_value = match_value
            .filter(|v| predicate.uses_link_match() && !v.trim().is_empty());
        Self {
            predicate,
            match_value,
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.predicate, self.match_value)
    }
}

/// Kind-specific step data. The variant determines the step's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum StepPayload {
    LeadSource(LeadSourcePayload),
    Message(MessagePayload),
    Delay(DelayPayload),
    Condition(ConditionPayload),
    Goal(GoalPayload),
}

impl StepPayload {
    pub fn kind(&self) -> StepKind {
        match self {
            StepPayload::LeadSource(_) => StepKind::LeadSource,
            StepPayload::Message(_) => StepKind::Message,
            StepPayload::Delay(_) => StepKind::Delay,
            StepPayload::Condition(_) => StepKind::Condition,
            StepPayload::Goal(_) => StepKind::Goal,
        }
    }
}

/// A typed node of the campaign graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub id: StepId,
    pub position: Position,
    pub payload: StepPayload,
}

impl Step {
    pub fn kind(&self) -> StepKind {
        self.payload.kind()
    }
}
