use crate::graph::{
    ConditionPayload, DelayPayload, GoalPayload, LeadSourcePayload, MessagePayload, StepKind,
    StepPayload,
};
use crate::routing::RoutingContext;

/// The payload a freshly inserted step of `kind` starts with.
pub fn default_payload(kind: StepKind, routing: &RoutingContext) -> StepPayload {
    let recipient_ref = routing.recipient().map(str::to_string);
    match kind {
        StepKind::Message => StepPayload::Message(MessagePayload {
            recipient_ref,
            subject: "New Email".to_string(),
            body: "Write your email content here...".to_string(),
        }),
        StepKind::Delay => StepPayload::Delay(DelayPayload::default()),
        StepKind::LeadSource => StepPayload::LeadSource(LeadSourcePayload {
            recipient_ref,
            name: "New Lead Source".to_string(),
            description: "Describe your lead source...".to_string(),
        }),
        StepKind::Condition => StepPayload::Condition(ConditionPayload::default()),
        StepKind::Goal => StepPayload::Goal(GoalPayload {
            name: "Conversion Goal".to_string(),
            description: "Describe your conversion goal...".to_string(),
        }),
    }
}
