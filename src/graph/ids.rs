use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a step, unique for the lifetime of its graph.
///
/// Generated ids (`step_N`) order by their number, ahead of any other id;
/// other ids order lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

/// Identifier of a connection between two steps. Ordered like `StepId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

macro_rules! impl_id {
    ($name:ident, $prefix:expr) => {
        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The numeric suffix of ids generated by an `IdSequence`, if any.
            fn sequence_number(&self) -> Option<u64> {
                self.0
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .and_then(|n| n.parse().ok())
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                match (self.sequence_number(), other.sequence_number()) {
                    (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => self.0.cmp(&other.0),
                }
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

impl_id!(StepId, "step");
impl_id!(ConnectionId, "conn");

/// Monotonic source of step and connection ids.
///
/// The counters only ever move forward. Restoring an older graph snapshot keeps
/// the larger of the two counters so ids handed out once are never reissued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSequence {
    next_step: u64,
    next_connection: u64,
}

impl IdSequence {
    pub fn next_step_id(&mut self) -> StepId {
        self.next_step += 1;
        StepId(format!("{}_{}", StepId::PREFIX, self.next_step))
    }

    pub fn next_connection_id(&mut self) -> ConnectionId {
        self.next_connection += 1;
        ConnectionId(format!("{}_{}", ConnectionId::PREFIX, self.next_connection))
    }

    /// Advances past an externally supplied step id so it can never be generated.
    pub fn observe_step(&mut self, id: &StepId) {
        if let Some(n) = id.sequence_number() {
            self.next_step = self.next_step.max(n);
        }
    }

    pub fn observe_connection(&mut self, id: &ConnectionId) {
        if let Some(n) = id.sequence_number() {
            self.next_connection = self.next_connection.max(n);
        }
    }

    /// Component-wise maximum of two sequences.
    pub fn merge(self, other: IdSequence) -> IdSequence {
        IdSequence {
            next_step: self.next_step.max(other.next_step),
            next_connection: self.next_connection.max(other.next_connection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_skips_observed_ids() {
        let mut seq = IdSequence::default();
        seq.observe_step(&StepId::new("step_41"));
        seq.observe_step(&StepId::new("node_1712345"));
        assert_eq!(seq.next_step_id().as_str(), "step_42");
        assert_eq!(seq.next_connection_id().as_str(), "conn_1");
    }

    #[test]
    fn test_generated_ids_order_numerically() {
        let mut ids = vec![
            StepId::new("step_10"),
            StepId::new("intro"),
            StepId::new("step_2"),
            StepId::new("step_1"),
            StepId::new("alpha"),
        ];
        ids.sort();
        let ordered: Vec<_> = ids.iter().map(StepId::as_str).collect();
        assert_eq!(ordered, ["step_1", "step_2", "step_10", "alpha", "intro"]);
        assert!(ConnectionId::new("conn_9") < ConnectionId::new("conn_11"));
    }

    #[test]
    fn test_merge_keeps_larger_counters() {
        let mut a = IdSequence::default();
        a.next_step_id();
        a.next_step_id();
        let mut b = IdSequence::default();
        b.next_connection_id();
        let mut merged = a.merge(b);
        assert_eq!(merged.next_step_id().as_str(), "step_3");
        assert_eq!(merged.next_connection_id().as_str(), "conn_2");
    }
}
