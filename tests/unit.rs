//! Unit tests for error messages, schedule rendering and artifacts.
mod common;
use common::*;
use drip::planner::format_offset;
use drip::prelude::*;
use std::time::Duration;

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_cycle_error_lists_path() {
        let err = PlanError::CycleDetected {
            step_id: StepId::new("b"),
            path: vec![StepId::new("a"), StepId::new("b"), StepId::new("b")],
        };
        assert_eq!(
            err.to_string(),
            "Cycle detected: step 'b' is revisited on path a -> b -> b"
        );
    }

    #[test]
    fn test_editor_error_is_transparent_over_graph_error() {
        let err = EditorError::from(GraphError::StepNotFound(StepId::new("step_9")));
        assert_eq!(err.to_string(), "Step 'step_9' not found");
    }

    #[test]
    fn test_multi_out_edge_message() {
        let err = PlanError::MultiOutEdgeOnLinearStep {
            step_id: StepId::new("step_1"),
            kind: StepKind::Delay,
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Step 'step_1' (delay) has 3 outgoing connections, but only one is allowed"
        );
    }
}

#[cfg(test)]
mod schedule_tests {
    use super::*;

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(Duration::from_secs(90 * 60)), "1h 30m");
        assert_eq!(format_offset(Duration::from_secs(14 * 86_400)), "2w");
    }

    #[test]
    fn test_schedule_renders_as_tree() {
        let (graph, _) = create_condition_graph();
        let schedule = plan(&graph, &clock()).unwrap();
        let expected = "\
Schedule 'Branching' planned at 2026-01-05T09:00:00+00:00
└── entry step_1
    ├── +0m     send step_2
    ├── [yes]
    │   ├── +0m     await opened on step_3
    │   └── +0m     send step_4
    └── [no]
        ├── +0m     await opened on step_3
        └── +3d     send step_6
";
        assert_eq!(schedule.to_string(), expected);
    }

    #[test]
    fn test_empty_branches_make_an_empty_schedule() {
        let mut graph = Graph::new("Lonely");
        graph.add_step(lead_source(), Position::default());
        let schedule = plan(&graph, &clock()).unwrap();
        assert_eq!(schedule.entries.len(), 1);
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_span(), Duration::ZERO);
    }
}

#[cfg(test)]
mod artifact_tests {
    use super::*;

    #[test]
    fn test_artifact_survives_disk() {
        let (graph, _) = create_condition_graph();
        let schedule = plan(&graph, &clock()).unwrap();
        let artifact = ScheduleArtifact::new(Some("abc".to_string()), schedule);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.bin");
        artifact.save(&path).unwrap();
        assert_eq!(ScheduleArtifact::from_file(&path).unwrap(), artifact);
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(ScheduleArtifact::from_bytes(&[0xff, 0x00, 0x13]).is_err());
    }
}
