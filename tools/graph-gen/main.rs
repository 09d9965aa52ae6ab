use clap::Parser;
use drip::prelude::{
    BranchLabel, ConditionPayload, DelayPayload, DelayUnit, EditorError, FlowchartDocument,
    Graph, GraphEditor, Position, Predicate, RoutingContext, StepId, StepKind, StepPayload,
    SystemClock, plan,
};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;
use std::num::NonZeroU32;

/// A CLI tool to generate random, well-formed campaign flowcharts
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flowchart.json")]
    output: String,

    /// Name of the generated campaign
    #[arg(short, long, default_value = "Generated campaign")]
    name: String,

    /// How many condition steps may be nested along one path
    #[arg(long, default_value_t = 2)]
    max_depth: usize,

    /// Maximum number of steps in a straight run between forks
    #[arg(long, default_value_t = 4)]
    max_run: usize,

    /// Recipient routed into the generated lead source and message steps
    #[arg(long, default_value = "lead@example.com")]
    recipient: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.max_run == 0 {
        eprintln!("Error: --max-run must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating campaign '{}' (fork depth up to {}, runs up to {} steps)...",
        cli.name, cli.max_depth, cli.max_run
    );

    let routing = RoutingContext::new().with_recipient(cli.recipient.as_str());
    let mut editor = GraphEditor::new(Graph::new(cli.name.as_str()));
    editor.begin_add_first_step(None, &routing)?;
    let source = editor.choose_step_kind(StepKind::LeadSource, &routing)?;

    grow(&mut editor, &mut rng, &routing, &cli, source, None, 0)?;

    let graph = editor.graph();
    // Generated graphs must always be plannable.
    let schedule = plan(graph, &SystemClock)?;
    println!(
        "-> {} steps, {} connections, {} planned actions",
        graph.step_count(),
        graph.connection_count(),
        schedule.actions().len()
    );

    let json_output = FlowchartDocument::from_graph(graph).to_json_pretty()?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved flowchart to '{}'", cli.output);

    Ok(())
}

/// Appends a random straight run after `origin`, ending in a goal or in a
/// condition whose branches are grown recursively.
fn grow(
    editor: &mut GraphEditor,
    rng: &mut ThreadRng,
    routing: &RoutingContext,
    cli: &Cli,
    origin: StepId,
    label: Option<BranchLabel>,
    depth: usize,
) -> Result<(), EditorError> {
    let mut tail = origin;
    let mut tail_label = label;

    for _ in 0..rng.random_range(1..=cli.max_run) {
        let kind = if rng.random_bool(0.5) {
            StepKind::Message
        } else {
            StepKind::Delay
        };
        tail = append(editor, routing, &tail, tail_label.take(), kind)?;
        if kind == StepKind::Delay {
            randomize_delay(editor, rng, &tail)?;
        }
    }

    if depth < cli.max_depth && rng.random_bool(0.6) {
        let condition = append(editor, routing, &tail, tail_label.take(), StepKind::Condition)?;
        let predicate = [
            Predicate::Opened,
            Predicate::Clicked,
            Predicate::Replied,
            Predicate::NotOpened,
        ][rng.random_range(0..4)];
        editor.update_payload(
            &condition,
            StepPayload::Condition(ConditionPayload::new(predicate, None)),
        )?;
        for outcome in BranchLabel::ORDER {
            grow(editor, rng, routing, cli, condition.clone(), Some(outcome), depth + 1)?;
        }
    } else {
        append(editor, routing, &tail, tail_label.take(), StepKind::Goal)?;
    }
    Ok(())
}

fn append(
    editor: &mut GraphEditor,
    routing: &RoutingContext,
    origin: &StepId,
    label: Option<BranchLabel>,
    kind: StepKind,
) -> Result<StepId, EditorError> {
    editor.begin_add_step_from(origin, Position::default(), label)?;
    editor.choose_step_kind(kind, routing)
}

fn randomize_delay(
    editor: &mut GraphEditor,
    rng: &mut ThreadRng,
    step: &StepId,
) -> Result<(), EditorError> {
    let unit = [DelayUnit::Hours, DelayUnit::Days, DelayUnit::Weeks][rng.random_range(0..3)];
    let amount = NonZeroU32::new(rng.random_range(1..=5)).unwrap_or(NonZeroU32::MIN);
    editor.update_payload(step, StepPayload::Delay(DelayPayload::new(amount, unit)))
}
