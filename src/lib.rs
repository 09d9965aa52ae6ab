//! # Drip - Campaign Graph Editing and Execution Planning
//!
//! **Drip** models outbound campaigns as directed graphs of typed steps (lead
//! sources, messages, delays, conditions and goals), edits them through an
//! undoable editor and plans them into a schedule of timed actions and
//! event-conditioned branches.
//!
//! ## Core Workflow
//!
//! 1.  **Build or load a graph**: start from an empty `Graph` or convert a
//!     stored `FlowchartDocument` with the `IntoGraph` trait.
//! 2.  **Edit**: wrap it in a `GraphEditor`. Steps are inserted through a
//!     two-phase chooser (`begin_add_*`, then `choose_step_kind`), wired with
//!     `connect`, and every change can be undone and redone.
//! 3.  **Plan**: hand a graph to a `Planner`. The resulting `Schedule` is a
//!     tree: delays push later actions back, and every condition step forks
//!     the tree into the outcomes the event feed will decide later.
//! 4.  **Dispatch**: pass the schedule to a `Dispatcher`, or let a
//!     `CampaignRunner` do load, plan and dispatch in one go.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drip::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let routing = RoutingContext::new().with_recipient("ada@example.com");
//!     let mut editor = GraphEditor::new(Graph::new("Welcome sequence"));
//!
//!     // The first step: a lead source.
//!     editor.begin_add_first_step(None, &routing)?;
//!     let source = editor.choose_step_kind(StepKind::LeadSource, &routing)?;
//!
//!     // Wait a day, then send the first email.
//!     editor.begin_add_step_from(&source, Position::default(), None)?;
//!     let delay = editor.choose_step_kind(StepKind::Delay, &routing)?;
//!     editor.begin_add_step_from(&delay, Position::default(), None)?;
//!     editor.choose_step_kind(StepKind::Message, &routing)?;
//!
//!     let planner = Planner::builder().with_routing(routing).build();
//!     let schedule = planner.plan(editor.graph(), &SystemClock)?;
//!     println!("{}", schedule);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod graph;
pub mod history;
pub mod planner;
pub mod prelude;
pub mod routing;
pub mod store;
