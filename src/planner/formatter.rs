use super::schedule::{Action, PlanBranch, PlanNode, Schedule};
use itertools::Itertools;
use std::fmt;
use std::time::Duration;

/// Renders a schedule as an indented tree, one line per action.
///
/// ```text
/// Schedule 'Welcome' planned at 2026-01-05T09:00:00+00:00
/// └── entry step_1
///     ├── +0m     send step_2 to ada@example.com
///     └── [yes]
///         ├── +2d     await opened on step_4
///         └── +2d     record goal step_5
/// ```
pub struct ScheduleFormatter<'a> {
    pub schedule: &'a Schedule,
}

impl fmt::Display for ScheduleFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Schedule '{}' planned at {}",
            self.schedule.name,
            self.schedule.planned_at.to_rfc3339()
        )?;
        let count = self.schedule.entries.len();
        for (i, entry) in self.schedule.entries.iter().enumerate() {
            let is_last = i + 1 == count;
            writeln!(f, "{}entry {}", marker(is_last), entry.lead_source)?;
            self.fmt_branch(&entry.root, f, &child_prefix("", is_last))?;
        }
        Ok(())
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ScheduleFormatter { schedule: self }, f)
    }
}

impl ScheduleFormatter<'_> {
    fn fmt_branch(
        &self,
        branch: &PlanBranch,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
    ) -> fmt::Result {
        let total = branch.actions.len() + branch.forks.len();
        for (i, node) in branch.actions.iter().enumerate() {
            writeln!(f, "{}{}{}", prefix, marker(i + 1 == total), format_node(node))?;
        }
        for (j, fork) in branch.forks.iter().enumerate() {
            let is_last = branch.actions.len() + j + 1 == total;
            let label = fork
                .label
                .map_or_else(|| "branch".to_string(), |l| format!("[{}]", l));
            writeln!(f, "{}{}{}", prefix, marker(is_last), label)?;
            self.fmt_branch(fork, f, &child_prefix(prefix, is_last))?;
        }
        Ok(())
    }
}

fn marker(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { "    " } else { "│   " })
}

fn format_node(node: &PlanNode) -> String {
    let offset = format!("+{}", format_offset(node.fire_at_offset));
    let action = match &node.action {
        Action::Send { step_id, recipient } => match recipient {
            Some(r) => format!("send {} to {}", step_id, r),
            None => format!("send {}", step_id),
        },
        Action::RecordGoal { step_id } => format!("record goal {}", step_id),
        Action::AwaitEvent {
            step_id,
            predicate,
            match_value,
            ..
        } => match match_value {
            Some(link) => format!("await {} '{}' on {}", predicate, link, step_id),
            None => format!("await {} on {}", predicate, step_id),
        },
    };
    format!("{:<8}{}", offset, action)
}

/// Compact "1w 2d 3h 4m" rendering; zero renders as "0m".
pub fn format_offset(offset: Duration) -> String {
    const UNITS: [(u64, &str); 4] = [(7 * 86_400, "w"), (86_400, "d"), (3_600, "h"), (60, "m")];
    let mut remaining = offset.as_secs();
    let parts = UNITS
        .iter()
        .filter_map(|(size, suffix)| {
            let n = remaining / size;
            remaining %= size;
            (n > 0).then(|| format!("{}{}", n, suffix))
        })
        .collect_vec();
    if parts.is_empty() {
        "0m".to_string()
    } else {
        parts.join(" ")
    }
}
