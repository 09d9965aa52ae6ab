use crate::graph::StepKind;

/// One entry of the "add step" chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: StepKind,
    pub label: &'static str,
    pub description: &'static str,
}

pub const STEP_CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        kind: StepKind::Message,
        label: "Cold Email",
        description: "Send an email to the lead",
    },
    CatalogEntry {
        kind: StepKind::Delay,
        label: "Delay",
        description: "Wait for a period of time",
    },
    CatalogEntry {
        kind: StepKind::LeadSource,
        label: "Lead Source",
        description: "Define where leads come from",
    },
    CatalogEntry {
        kind: StepKind::Condition,
        label: "Condition",
        description: "Branch based on conditions",
    },
    CatalogEntry {
        kind: StepKind::Goal,
        label: "Goal",
        description: "Define conversion goals",
    },
];

/// Chooser entries whose label contains `term`, ignoring case. An empty term
/// matches everything.
pub fn search_step_kinds(term: &str) -> Vec<CatalogEntry> {
    let needle = term.trim().to_lowercase();
    STEP_CATALOG
        .iter()
        .filter(|entry| entry.label.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = search_step_kinds("EMAIL");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, StepKind::Message);
    }

    #[test]
    fn test_empty_search_lists_every_kind() {
        assert_eq!(search_step_kinds("").len(), StepKind::ALL.len());
        assert!(search_step_kinds("webhook").is_empty());
    }
}
