//! Tests for converting flowchart documents to and from graphs.
mod common;
use common::*;
use drip::prelude::*;
use std::num::NonZeroU32;

const LEGACY_JSON: &str = r##"{
    "name": "Legacy import",
    "leadSources": [{ "name": "Ada", "email": "ada@example.com" }],
    "nodes": [
        { "id": "source", "type": "leadSource", "position": { "x": 0, "y": 0 },
          "data": { "name": "Webinar", "description": "Signups", "color": "#fff" } },
        { "id": "intro", "type": "coldEmail", "position": { "x": 400, "y": 0 },
          "data": { "subject": "Welcome", "body": "Hi!", "recipient": "ada@example.com" } },
        { "id": "wait", "type": "delay", "data": { "amount": "3", "unit": "hours" } },
        { "id": "check", "type": "conditionNode",
          "data": { "type": "clicked", "value": "pricing" } },
        { "id": "won", "type": "goalNode", "data": { "name": "Booked a call" } },
        { "id": "lost", "type": "goalNode" }
    ],
    "edges": [
        { "id": "e1", "source": "source", "target": "intro", "sourceHandle": null },
        { "id": "e2", "source": "intro", "target": "wait" },
        { "id": "e3", "source": "wait", "target": "check", "sourceHandle": "bottom" },
        { "id": "e4", "source": "check", "target": "won", "sourceHandle": "yes" },
        { "source": "check", "target": "lost", "sourceHandle": "no" }
    ]
}"##;

#[cfg(test)]
mod document_tests {
    use super::*;

    fn legacy_graph() -> Graph {
        FlowchartDocument::from_json(LEGACY_JSON)
            .expect("Failed to parse document")
            .into_graph()
            .expect("Failed to convert document")
    }

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let graph = legacy_graph();
        assert_eq!(graph.name(), "Legacy import");
        assert_eq!(graph.step_count(), 6);
        assert_eq!(graph.connection_count(), 5);
        assert_eq!(graph.lead_sources()[0].email(), Some("ada@example.com"));

        let intro = graph.step(&StepId::new("intro")).unwrap();
        assert_eq!(intro.position, Position::new(400.0, 0.0));
        match &intro.payload {
            StepPayload::Message(m) => {
                assert_eq!(m.subject, "Welcome");
                assert_eq!(m.recipient_ref.as_deref(), Some("ada@example.com"));
            }
            other => panic!("Expected a message payload, got {:?}", other),
        }
    }

    #[test]
    fn test_delay_amount_may_be_a_string() {
        let graph = legacy_graph();
        let wait = graph.step(&StepId::new("wait")).unwrap();
        assert_eq!(
            wait.payload,
            StepPayload::Delay(DelayPayload::new(
                NonZeroU32::new(3).unwrap(),
                DelayUnit::Hours
            ))
        );
    }

    #[test]
    fn test_condition_aliases_and_handles() {
        let graph = legacy_graph();
        let check = StepId::new("check");
        assert_eq!(
            graph.step(&check).unwrap().payload,
            StepPayload::Condition(ConditionPayload {
                predicate: Predicate::Clicked,
                match_value: Some("pricing".to_string()),
            })
        );
        let no = graph.outgoing(&check, Some(BranchLabel::No));
        assert_eq!(no.len(), 1);
        assert_eq!(no[0].target, StepId::new("lost"));
        assert_eq!(no[0].id.as_str(), "conn_1");

        // Handles that are not yes/no carry no label.
        let e3 = graph.connection(&ConnectionId::new("e3")).unwrap();
        assert_eq!(e3.branch_label, None);
    }

    #[test]
    fn test_missing_payload_uses_defaults() {
        let graph = legacy_graph();
        assert_eq!(
            graph.step(&StepId::new("lost")).unwrap().payload,
            StepPayload::Goal(GoalPayload::default())
        );
    }

    #[test]
    fn test_match_value_dropped_for_non_link_predicate() {
        let json = r#"{ "nodes": [
            { "id": "c", "kind": "condition",
              "payload": { "predicate": "opened", "matchValue": "x" } }
        ] }"#;
        let graph = FlowchartDocument::from_json(json).unwrap().into_graph().unwrap();
        assert_eq!(
            graph.step(&StepId::new("c")).unwrap().payload,
            StepPayload::Condition(ConditionPayload::default())
        );
    }

    #[test]
    fn test_invalid_delay_amount() {
        let json = r#"{ "nodes": [
            { "id": "w", "kind": "delay", "payload": { "amount": 0, "unit": "days" } }
        ] }"#;
        let err = FlowchartDocument::from_json(json)
            .unwrap()
            .into_graph()
            .unwrap_err();
        match err {
            ConversionError::InvalidStep { step_id, .. } => assert_eq!(step_id, "w"),
            other => panic!("Expected InvalidStep, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_step_id() {
        let json = r#"{ "nodes": [
            { "id": "a", "kind": "goal" },
            { "id": "a", "kind": "goal" }
        ] }"#;
        let err = FlowchartDocument::from_json(json)
            .unwrap()
            .into_graph()
            .unwrap_err();
        assert_eq!(err, ConversionError::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_dangling_edge() {
        let json = r#"{
            "nodes": [{ "id": "a", "kind": "message" }],
            "edges": [{ "id": "e", "source": "a", "target": "b" }]
        }"#;
        let err = FlowchartDocument::from_json(json)
            .unwrap()
            .into_graph()
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Graph(GraphError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FlowchartDocument::from_json("{ nodes: "),
            Err(ConversionError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_graph_survives_document_round_trip() {
        let (graph, _) = create_condition_graph();
        let json = FlowchartDocument::from_graph(&graph)
            .to_json_pretty()
            .unwrap();
        let restored = FlowchartDocument::from_json(&json)
            .unwrap()
            .into_graph()
            .unwrap();
        assert_eq!(restored, graph);
    }

    #[test]
    fn test_loaded_ids_are_not_regenerated() {
        let (graph, _) = create_linear_graph();
        let restored = FlowchartDocument::from_graph(&graph).into_graph().unwrap();
        let mut editor = GraphEditor::new(restored);
        let copy = editor.duplicate_step(&StepId::new("step_3")).unwrap();
        assert_eq!(copy.as_str(), "step_4");
    }
}
