use crate::clock::Clock;
use crate::error::PlanError;
use crate::graph::Graph;
use crate::routing::RoutingContext;
use tracing::info;

mod formatter;
mod schedule;
mod walker;

pub use formatter::{ScheduleFormatter, format_offset};
pub use schedule::{Action, EntryPlan, PlanBranch, PlanNode, Schedule};
use walker::PlanWalker;

/// Turns a campaign graph into a `Schedule`.
///
/// Planning is pure: it reads the graph, consults the clock once for the
/// planning instant and has no other inputs. A `Planner` can be shared across
/// threads and used on any number of graphs.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    routing: RoutingContext,
}

#[derive(Debug, Clone, Default)]
pub struct PlannerBuilder {
    routing: RoutingContext,
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipient used for message steps that do not name their own.
    pub fn with_routing(mut self, routing: RoutingContext) -> Self {
        self.routing = routing;
        self
    }

    pub fn build(self) -> Planner {
        Planner {
            routing: self.routing,
        }
    }
}

impl Planner {
    pub fn builder() -> PlannerBuilder {
        PlannerBuilder::new()
    }

    pub fn routing(&self) -> &RoutingContext {
        &self.routing
    }

    /// Plans every lead source step of `graph`, in step id order.
    ///
    /// # Errors
    ///
    /// * `NoEntryPoint` if the graph has no lead source step.
    /// * `CycleDetected` if any branch path revisits a step.
    /// * `MultiOutEdgeOnLinearStep` if any step other than a condition has more
    ///   than one outgoing connection.
    /// * `OffsetOutOfRange` if accumulated delays cannot be represented as a
    ///   timestamp.
    pub fn plan<C: Clock + ?Sized>(&self, graph: &Graph, clock: &C) -> Result<Schedule, PlanError> {
        let entry_points: Vec<_> = graph.entry_points().collect();
        if entry_points.is_empty() {
            return Err(PlanError::NoEntryPoint);
        }

        let planned_at = clock.now();
        let walker = PlanWalker::new(graph, &self.routing, planned_at);
        let entries = entry_points
            .into_iter()
            .map(|entry| {
                walker.walk_entry(entry).map(|root| EntryPlan {
                    lead_source: entry.id.clone(),
                    root,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let schedule = Schedule {
            name: graph.name().to_string(),
            planned_at,
            entries,
        };
        info!(
            graph = %schedule.name,
            entries = schedule.entries.len(),
            actions = schedule.actions().len(),
            span = ?schedule.total_span(),
            "planned schedule"
        );
        Ok(schedule)
    }
}

/// Plans `graph` with an empty routing context.
pub fn plan<C: Clock + ?Sized>(graph: &Graph, clock: &C) -> Result<Schedule, PlanError> {
    Planner::default().plan(graph, clock)
}
