use std::sync::Arc;

use super::support::{Journal, Recorder, ShutdownMode};
use crate::kernel::component::{ComponentId, ComponentManager, ShutdownFailure, ShutdownReport};
use crate::kernel::context::{AppContext, StopHandle};
use crate::kernel::error::Error;
use crate::kernel::registry::ServiceRegistry;

fn test_context() -> AppContext {
    AppContext::new(Arc::new(ServiceRegistry::new()), StopHandle::new())
}

#[test]
fn test_add_assigns_insertion_order_ids() {
    let journal = Journal::default();
    let mut manager = ComponentManager::new();
    assert!(manager.is_empty());

    let a = manager.add(Box::new(Recorder::new("a", &journal)));
    let b = manager.add(Box::new(Recorder::new("b", &journal)));

    assert_eq!(a, ComponentId(0));
    assert_eq!(b.index(), 1);
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.names(), vec!["a", "b"]);
    assert_eq!(manager.component(b).map(|c| c.name()), Some("b"));
    assert!(manager.component(ComponentId(5)).is_none());
}

#[test]
fn test_initialize_all_polls_until_every_component_ready() {
    let journal = Journal::default();
    let ctx = test_context();
    let mut manager = ComponentManager::new();
    manager.add(Box::new(Recorder::new("slow", &journal).ready_after(2)));
    manager.add(Box::new(Recorder::new("fast", &journal)));

    assert!(!manager.initialize_all(&ctx).unwrap());
    assert!(!manager.initialize_all(&ctx).unwrap());
    assert!(manager.initialize_all(&ctx).unwrap());
    assert!(manager.is_initialized());

    // Ready components are not asked again.
    assert_eq!(journal.count("init:fast"), 1);
    assert_eq!(journal.count("init:slow"), 3);

    assert!(manager.initialize_all(&ctx).unwrap());
    assert_eq!(journal.count("init:"), 4);
}

#[test]
fn test_empty_manager_is_initialized() {
    let mut manager = ComponentManager::new();
    assert!(manager.initialize_all(&test_context()).unwrap());
}

#[test]
fn test_initialize_error_aborts_pass() {
    let journal = Journal::default();
    let mut manager = ComponentManager::new();
    manager.add(Box::new(Recorder::new("ok", &journal)));
    manager.add(Box::new(Recorder::new("bad", &journal).failing_init()));
    manager.add(Box::new(Recorder::new("never", &journal)));

    let err = manager.initialize_all(&test_context()).unwrap_err();
    match err {
        Error::ComponentInit { index, name, .. } => {
            assert_eq!(index, 1);
            assert_eq!(name, "bad");
        }
        other => panic!("Unexpected error: {other:?}"),
    }
    assert_eq!(journal.count("init:never"), 0);
}

#[test]
fn test_process_all_runs_in_order_and_stops_on_error() {
    let journal = Journal::default();
    let mut manager = ComponentManager::new();
    manager.add(Box::new(Recorder::new("a", &journal)));
    manager.add(Box::new(Recorder::new("b", &journal).failing_process()));
    manager.add(Box::new(Recorder::new("c", &journal)));

    let err = manager.process_all(&test_context()).unwrap_err();
    assert!(matches!(err, Error::ComponentProcess { index: 1, .. }));
    assert_eq!(journal.entries(), vec!["process:a", "process:b"]);
}

#[test]
fn test_shutdown_all_visits_capable_components_in_order() {
    let journal = Journal::default();
    let mut manager = ComponentManager::new();
    manager.add(Box::new(Recorder::new("a", &journal)));
    manager.add(Box::new(Recorder::new("b", &journal).shutdown_mode(ShutdownMode::Unsupported)));
    manager.add(Box::new(Recorder::new("c", &journal).shutdown_mode(ShutdownMode::Fail("disk full"))));
    manager.add(Box::new(Recorder::new("d", &journal).shutdown_mode(ShutdownMode::Panic)));
    manager.add(Box::new(Recorder::new("e", &journal)));

    let report = manager.shutdown_all(15);

    assert_eq!(report.invoked, vec![0, 2, 3, 4]);
    assert_eq!(
        journal.entries(),
        vec!["shutdown:a:15", "shutdown:c:15", "shutdown:d:15", "shutdown:e:15"]
    );
    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].index, 2);
    assert_eq!(report.failures[0].name, "c");
    assert_eq!(report.failures[1].message, "boom");
    assert_eq!(
        report.summary(),
        "Component [2] error: Error: disk full; Component [3] error: boom"
    );
}

#[test]
fn test_clean_shutdown_report() {
    let journal = Journal::default();
    let mut manager = ComponentManager::new();
    manager.add(Box::new(Recorder::new("a", &journal)));

    let report = manager.shutdown_all(0);
    assert!(report.is_clean());
    assert_eq!(report.summary(), "");
    assert_eq!(report, ShutdownReport { invoked: vec![0], failures: vec![] });
}

#[test]
fn test_shutdown_failure_display() {
    let failure = ShutdownFailure {
        index: 4,
        name: "net".into(),
        message: "socket closed".into(),
    };
    assert_eq!(failure.to_string(), "Component [4] error: socket closed");
}
