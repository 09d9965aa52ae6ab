use super::{Dispatcher, FlowchartStore, RunRequest};
use crate::clock::Clock;
use crate::document::IntoGraph;
use crate::error::RunError;
use crate::planner::{Planner, Schedule};
use crate::routing::RoutingContext;
use tracing::info;

/// Loads a stored flowchart, plans it and hands the schedule to a dispatcher.
///
/// Nothing is dispatched unless loading, conversion and planning all succeed.
pub struct CampaignRunner<S, D, C> {
    store: S,
    dispatcher: D,
    clock: C,
    routing: RoutingContext,
}

impl<S: FlowchartStore, D: Dispatcher, C: Clock> CampaignRunner<S, D, C> {
    pub fn new(store: S, dispatcher: D, clock: C) -> Self {
        Self {
            store,
            dispatcher,
            clock,
            routing: RoutingContext::default(),
        }
    }

    /// Default recipient for runs whose lead sources carry no email.
    pub fn with_routing(mut self, routing: RoutingContext) -> Self {
        self.routing = routing;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn run(&mut self, flowchart_id: &str) -> Result<Schedule, RunError> {
        let document = self.store.load(flowchart_id)?;
        let graph = document.clone().into_graph()?;

        let mut routing = self.routing.clone().with_lead_sources(graph.lead_sources().to_vec());
        if !routing.has_recipient() {
            routing.route_to_first_lead();
        }

        let schedule = Planner::builder()
            .with_routing(routing)
            .build()
            .plan(&graph, &self.clock)?;

        let request = RunRequest {
            flowchart_id: flowchart_id.to_string(),
            flowchart: document,
            schedule,
        };
        self.dispatcher.dispatch(&request)?;
        info!(flowchart_id, "campaign scheduled");
        Ok(request.schedule)
    }
}
