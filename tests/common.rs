//! Common test utilities for building campaign graphs.
use chrono::{DateTime, TimeZone, Utc};
use drip::prelude::*;
use std::num::NonZeroU32;

pub const RECIPIENT: &str = "ada@example.com";

/// Routing context with the shared test recipient.
#[allow(dead_code)]
pub fn routing() -> RoutingContext {
    RoutingContext::new().with_recipient(RECIPIENT)
}

/// A fixed planning instant: Monday 2026-01-05 09:00 UTC.
#[allow(dead_code)]
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn clock() -> FixedClock {
    FixedClock(start())
}

#[allow(dead_code)]
pub fn delay(amount: u32, unit: DelayUnit) -> StepPayload {
    StepPayload::Delay(DelayPayload::new(NonZeroU32::new(amount).unwrap(), unit))
}

#[allow(dead_code)]
pub fn message(subject: &str) -> StepPayload {
    StepPayload::Message(MessagePayload {
        recipient_ref: None,
        subject: subject.to_string(),
        body: String::new(),
    })
}

#[allow(dead_code)]
pub fn lead_source() -> StepPayload {
    StepPayload::LeadSource(LeadSourcePayload::default())
}

#[allow(dead_code)]
pub fn goal(name: &str) -> StepPayload {
    StepPayload::Goal(GoalPayload {
        name: name.to_string(),
        description: String::new(),
    })
}

#[allow(dead_code)]
pub fn condition(predicate: Predicate) -> StepPayload {
    StepPayload::Condition(ConditionPayload::new(predicate, None))
}

/// The ids of the steps in `create_linear_graph`.
#[allow(dead_code)]
pub struct LinearIds {
    pub source: StepId,
    pub wait: StepId,
    pub email: StepId,
}

/// Creates `LeadSource -> Delay(2 days) -> Message`.
#[allow(dead_code)]
pub fn create_linear_graph() -> (Graph, LinearIds) {
    let mut graph = Graph::new("Linear");
    let source = graph.add_step(lead_source(), Position::new(0.0, 0.0));
    let wait = graph.add_step(delay(2, DelayUnit::Days), Position::new(400.0, 0.0));
    let email = graph.add_step(message("Hello"), Position::new(800.0, 0.0));
    graph.add_connection(&source, &wait, None).unwrap();
    graph.add_connection(&wait, &email, None).unwrap();
    (graph, LinearIds { source, wait, email })
}

/// The ids of the steps in `create_condition_graph`.
#[allow(dead_code)]
pub struct ConditionIds {
    pub source: StepId,
    pub intro: StepId,
    pub check: StepId,
    pub follow_up: StepId,
    pub nudge: StepId,
}

/// Creates a lead source that sends an intro email and then forks on "opened":
/// `yes` sends a follow-up, `no` waits 3 days and sends a nudge.
#[allow(dead_code)]
pub fn create_condition_graph() -> (Graph, ConditionIds) {
    let mut graph = Graph::new("Branching");
    let source = graph.add_step(lead_source(), Position::default());
    let intro = graph.add_step(message("Intro"), Position::default());
    let check = graph.add_step(condition(Predicate::Opened), Position::default());
    let follow_up = graph.add_step(message("Follow up"), Position::default());
    let wait = graph.add_step(delay(3, DelayUnit::Days), Position::default());
    let nudge = graph.add_step(message("Nudge"), Position::default());

    graph.add_connection(&source, &intro, None).unwrap();
    graph.add_connection(&intro, &check, None).unwrap();
    graph
        .add_connection(&check, &follow_up, Some(BranchLabel::Yes))
        .unwrap();
    graph
        .add_connection(&check, &wait, Some(BranchLabel::No))
        .unwrap();
    graph.add_connection(&wait, &nudge, None).unwrap();

    (
        graph,
        ConditionIds {
            source,
            intro,
            check,
            follow_up,
            nudge,
        },
    )
}
