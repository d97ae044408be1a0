#[cfg(test)]
mod tests {
    use super::super::validation::creates_cycle;
    use crate::flow::{
        current_flow, with_flow, DuplicateTasks, Flow, FlowGraph, FlowOptions, FlowScope,
        Relationship,
    };
    use crate::error::{FlowError, TaskError};
    use crate::task::Task;
    use std::panic::AssertUnwindSafe;
    use std::sync::Arc;

    fn task(flow: &Arc<Flow>, name: &str) -> Task {
        Task::builder()
            .with_name(name)
            .with_flow(flow.clone())
            .build()
            .unwrap()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Relationship> {
        pairs
            .iter()
            .map(|(before, after)| Relationship::new(*before, *after))
            .collect()
    }

    #[test]
    fn test_creates_cycle() {
        let chain = edges(&[("a", "b"), ("b", "c")]);
        assert!(creates_cycle(&chain, "c", "a"));
        assert!(creates_cycle(&chain, "a", "a"));
        assert!(!creates_cycle(&chain, "a", "c"));
        assert!(!creates_cycle(&chain, "d", "a"));
    }

    #[test]
    fn test_creates_cycle_with_diamond() {
        let diamond = edges(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        assert!(!creates_cycle(&diamond, "b", "c"));
        assert!(creates_cycle(&diamond, "d", "a"));
    }

    #[test]
    fn test_run_before_records_edge() {
        let flow = Arc::new(Flow::new("pipeline"));
        let extract = task(&flow, "extract");
        let load = task(&flow, "load");

        extract.run_before(&[&load]).unwrap();

        assert_eq!(flow.relationships(), edges(&[("extract", "load")]));
        assert_eq!(flow.upstream("load"), vec!["extract".to_string()]);
        assert_eq!(flow.downstream("extract"), vec!["load".to_string()]);
        assert_eq!(extract.id(), "pipeline/extract");
    }

    #[test]
    fn test_operators_match_named_methods() {
        let flow = Arc::new(Flow::new("g"));
        let a = task(&flow, "a");
        let b = task(&flow, "b");
        let c = task(&flow, "c");
        let d = task(&flow, "d");

        (&a >> &b).unwrap();
        (&b | &c).unwrap();
        (&d << &c).unwrap();

        assert_eq!(
            flow.relationships(),
            edges(&[("a", "b"), ("b", "c"), ("c", "d")])
        );
    }

    #[test]
    fn test_run_after_with_several_tasks() {
        let flow = Arc::new(Flow::new("g"));
        let a = task(&flow, "a");
        let b = task(&flow, "b");
        let c = task(&flow, "c");

        c.run_after(&[&a, &b]).unwrap();

        assert_eq!(flow.relationships(), edges(&[("a", "c"), ("b", "c")]));
    }

    #[test]
    fn test_duplicate_edges_are_recorded_once() {
        let flow = Arc::new(Flow::new("g"));
        let a = task(&flow, "a");
        let b = task(&flow, "b");

        a.run_before(&[&b]).unwrap();
        b.run_after(&[&a]).unwrap();

        assert_eq!(flow.relationships().len(), 1);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let flow = Arc::new(Flow::new("g"));
        let a = task(&flow, "a");
        let b = task(&flow, "b");
        a.run_before(&[&b]).unwrap();

        let err = b.run_before(&[&a]).unwrap_err();
        assert!(matches!(err, TaskError::Flow(FlowError::Cycle { .. })));
        assert_eq!(flow.relationships().len(), 1);
    }

    #[test]
    fn test_cycles_allowed_when_configured() {
        let flow = Arc::new(Flow::with_options(
            "g",
            FlowOptions::new().with_reject_cycles(false),
        ));
        let a = task(&flow, "a");
        let b = task(&flow, "b");

        (&a >> &b).unwrap();
        (&b >> &a).unwrap();
        assert_eq!(flow.relationships().len(), 2);
    }

    #[test]
    fn test_relationship_with_foreign_task_is_rejected() {
        let flow = Arc::new(Flow::new("g"));
        let other = Arc::new(Flow::new("h"));
        let a = task(&flow, "a");
        let _b = task(&flow, "b");
        let stranger = task(&other, "stranger");
        let namesake = task(&other, "b");

        let err = a.run_before(&[&stranger]).unwrap_err();
        assert!(matches!(
            err,
            TaskError::Flow(FlowError::UnknownTask { ref task, .. }) if task == "stranger"
        ));

        let err = a.run_before(&[&namesake]).unwrap_err();
        assert!(matches!(
            err,
            TaskError::Flow(FlowError::UnknownTask { ref flow, ref task }) if flow == "g" && task == "b"
        ));
        let err = namesake.run_after(&[&a]).unwrap_err();
        assert!(matches!(err, TaskError::Flow(FlowError::UnknownTask { .. })));

        assert!(flow.relationships().is_empty());
        assert!(other.relationships().is_empty());
    }

    #[test]
    fn test_flows_sharing_an_id_stay_separate() {
        let flow = Arc::new(Flow::new("g"));
        let twin = Arc::new(Flow::new("g"));
        let a = task(&flow, "a");
        let twin_b = task(&twin, "b");
        let _b = task(&flow, "b");

        assert!(a.run_before(&[&twin_b]).is_err());
        assert!(flow.relationships().is_empty());
    }

    #[test]
    fn test_contains_task() {
        let flow = Arc::new(Flow::new("g"));
        let _a = task(&flow, "a");
        assert!(flow.contains_task("a"));
        assert!(!flow.contains_task("b"));
    }

    #[test]
    fn test_duplicate_tasks_ignored_by_default() {
        let flow = Arc::new(Flow::new("g"));
        let _first = task(&flow, "a");
        let _second = task(&flow, "a");
        assert_eq!(flow.tasks(), vec!["a".to_string()]);
    }

    #[test]
    fn test_duplicate_tasks_rejected_when_configured() {
        let flow = Arc::new(Flow::with_options(
            "g",
            FlowOptions::new().with_duplicate_tasks(DuplicateTasks::Reject),
        ));
        let _first = task(&flow, "a");
        let err = Task::builder()
            .with_name("a")
            .with_flow(flow.clone())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TaskError::Flow(FlowError::DuplicateTask { .. })
        ));
    }

    #[test]
    fn test_as_record() {
        let flow = Flow::new("g").with_name("Nightly");
        let record = flow.as_record();
        assert_eq!(record.id, "g");
        assert_eq!(record.name, "Nightly");
        assert_eq!(flow.name(), "Nightly");
    }

    #[test]
    fn test_no_ambient_flow_by_default() {
        assert!(current_flow().is_none());
    }

    #[test]
    fn test_scopes_nest_and_restore() {
        let outer = Arc::new(Flow::new("outer"));
        let inner = Arc::new(Flow::new("inner"));

        let _outer_scope = FlowScope::enter(outer.clone());
        assert_eq!(current_flow().unwrap().id(), "outer");
        {
            let _inner_scope = FlowScope::enter(inner.clone());
            assert_eq!(current_flow().unwrap().id(), "inner");
        }
        assert_eq!(current_flow().unwrap().id(), "outer");
    }

    #[test]
    fn test_with_flow_restores_after_panic() {
        let flow = Arc::new(Flow::new("g"));
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            with_flow(flow.clone(), || panic!("build failed"));
        }));
        assert!(result.is_err());
        assert!(current_flow().is_none());
    }

    #[test]
    fn test_sequential_scopes_do_not_leak() {
        let first = Arc::new(Flow::new("first"));
        let second = Arc::new(Flow::new("second"));

        let a = with_flow(first.clone(), || Task::builder().with_name("a").build());
        let b = with_flow(second.clone(), || Task::builder().with_name("b").build());

        assert_eq!(a.unwrap().id(), "first/a");
        assert_eq!(b.unwrap().id(), "second/b");
        assert_eq!(first.tasks(), vec!["a".to_string()]);
        assert_eq!(second.tasks(), vec!["b".to_string()]);
        assert!(current_flow().is_none());
    }
}
