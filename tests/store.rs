//! Tests for flowchart stores and the campaign runner.
mod common;
use common::*;
use drip::error::{RunError, StoreError};
use drip::prelude::*;
use drip::store::{JsonDirStore, MemoryStore, RecordingDispatcher};
use serde_json::json;

fn linear_document() -> FlowchartDocument {
    FlowchartDocument::from_graph(&create_linear_graph().0)
}

#[cfg(test)]
mod memory_store_tests {
    use super::*;

    #[test]
    fn test_save_load_update_delete() {
        let mut store = MemoryStore::new();
        let id = store.save(&linear_document(), None).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(&id).unwrap(), linear_document());

        let mut renamed = linear_document();
        renamed.name = "Renamed".to_string();
        assert_eq!(store.save(&renamed, Some(&id)).unwrap(), id);
        assert_eq!(store.load(&id).unwrap().name, "Renamed");
        assert_eq!(store.list().unwrap()[0].name, "Renamed");

        store.delete(&id).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.load(&id), Err(StoreError::NotFound(id)));
    }

    #[test]
    fn test_update_of_unknown_id_fails() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.save(&linear_document(), Some("nope")),
            Err(StoreError::NotFound("nope".to_string()))
        );
        assert!(store.is_empty());
    }
}

#[cfg(test)]
mod json_dir_store_tests {
    use super::*;

    #[test]
    fn test_documents_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut store = JsonDirStore::open(dir.path()).unwrap();
            store.save(&linear_document(), None).unwrap()
        };
        assert!(dir.path().join(format!("{}.json", id)).exists());

        let store = JsonDirStore::open(dir.path()).unwrap();
        assert_eq!(store.load(&id).unwrap(), linear_document());
        let summaries = store.list().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, id);
        assert_eq!(summaries[0].name, "Linear");
    }

    #[test]
    fn test_update_keeps_creation_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        let id = store.save(&linear_document(), None).unwrap();
        let created = store.list().unwrap()[0].created_at;

        let mut renamed = linear_document();
        renamed.name = "Second draft".to_string();
        store.save(&renamed, Some(&id)).unwrap();

        let summary = &store.list().unwrap()[0];
        assert_eq!(summary.created_at, created);
        assert_eq!(summary.name, "Second draft");
    }

    #[test]
    fn test_path_like_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load("../secret"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete("missing"), Err(StoreError::NotFound(_))));
    }
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    #[test]
    fn test_run_plans_and_dispatches() {
        let mut store = MemoryStore::new();
        let id = store.save(&linear_document(), None).unwrap();
        let mut runner = CampaignRunner::new(store, RecordingDispatcher::default(), clock())
            .with_routing(routing());

        let schedule = runner.run(&id).unwrap();
        assert_eq!(schedule.planned_at, start());

        let requests = &runner.dispatcher().requests;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].flowchart_id, id);
        assert_eq!(requests[0].flowchart.name, "Linear");
        assert_eq!(requests[0].schedule, schedule);
    }

    #[test]
    fn test_run_routes_to_first_lead_with_email() {
        let mut document = linear_document();
        document.lead_sources = vec![LeadRef::new(json!({ "email": "grace@example.com" }))];
        let mut store = MemoryStore::new();
        let id = store.save(&document, None).unwrap();
        let mut runner = CampaignRunner::new(store, RecordingDispatcher::default(), clock());

        let schedule = runner.run(&id).unwrap();
        assert_eq!(
            schedule.actions()[0].action,
            Action::Send {
                step_id: StepId::new("step_3"),
                recipient: Some("grace@example.com".to_string()),
            }
        );
    }

    #[test]
    fn test_nothing_is_dispatched_when_planning_fails() {
        let mut document = linear_document();
        document.nodes.retain(|n| n.kind != StepKind::LeadSource);
        document.edges.clear();
        let mut store = MemoryStore::new();
        let id = store.save(&document, None).unwrap();
        let mut runner = CampaignRunner::new(store, RecordingDispatcher::default(), clock());

        assert_eq!(runner.run(&id), Err(RunError::Plan(PlanError::NoEntryPoint)));
        assert!(runner.dispatcher().requests.is_empty());
    }

    #[test]
    fn test_unknown_flowchart() {
        let mut runner =
            CampaignRunner::new(MemoryStore::new(), RecordingDispatcher::default(), clock());
        assert_eq!(
            runner.run("missing"),
            Err(RunError::Store(StoreError::NotFound("missing".to_string())))
        );
    }
}
