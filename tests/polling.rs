//! Task polling lifecycle: refresh counts, exit classification and
//! hydrate-in-place semantics, driven through a mock transport.

mod common;

use std::time::Duration;

use serde_json::{json, Value};

use hub_client::{HubApiError, HubClient, TaskBacked, TaskStatus};

const POLL: Duration = Duration::from_millis(1);
const TIMEOUT: Duration = Duration::from_secs(10);

fn run_payload(state: &str) -> Value {
    json!({
        "id": "run-1",
        "name": "nightly",
        "status": {"state": state, "current": 0, "total": 10},
    })
}

/// Launch an evaluation against the mock; the creation response leaves the
/// run in the given state.
fn launched_run(
    client: &HubClient,
    transport: &common::MockTransport,
    state: &str,
) -> hub_client::EvaluationRun {
    transport.push_json(run_payload(state));
    let run = client.evaluate("ds-1", "model-1", None, None).unwrap();
    assert_eq!(transport.call_count(), 1);
    run
}

#[test]
fn finishes_after_three_refreshes() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "running");

    transport.push_json(run_payload("running"));
    transport.push_json(run_payload("running"));
    transport.push_json(json!({
        "id": "run-1",
        "status": {"state": "finished", "current": 10, "total": 10},
        "metrics": [{"name": "correctness", "passed": 9, "failed": 1, "total": 10}],
    }));

    run.wait_for_completion(TIMEOUT, POLL).unwrap();

    // One creation POST, then exactly three refresh GETs: the immediate one
    // plus two interval polls.
    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    for call in &calls[1..] {
        assert_eq!(call.method, "GET");
        assert_eq!(call.path, "/evaluations/run-1");
    }

    // The final payload hydrated the entity in place.
    assert!(run.is_finished());
    assert_eq!(run.metrics[0].passed, 9);
    assert!((run.metrics[0].percentage() - 90.0).abs() < f64::EPSILON);
}

#[test]
fn error_state_becomes_task_failed() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "running");

    transport.push_json(json!({
        "id": "run-1",
        "status": {"state": "error", "current": 3, "total": 10, "error": "model unreachable"},
    }));

    let err = run.wait_for_completion(TIMEOUT, POLL).unwrap_err();
    match err {
        HubApiError::TaskFailed { kind, message } => {
            assert_eq!(kind, "evaluation run");
            assert_eq!(message, "model unreachable");
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
    // The immediate refresh saw the terminal state; no interval polls ran.
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn still_running_at_the_deadline_becomes_task_timeout() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "running");

    for _ in 0..64 {
        transport.push_json(run_payload("running"));
    }

    let err = run
        .wait_for_completion(Duration::from_millis(20), Duration::from_millis(5))
        .unwrap_err();
    match err {
        HubApiError::TaskTimeout { kind, timeout } => {
            assert_eq!(kind, "evaluation run");
            assert!((timeout - 0.02).abs() < 1e-9);
        }
        other => panic!("expected TaskTimeout, got {other:?}"),
    }
    // At least the immediate refresh happened, and the run is still running.
    assert!(transport.call_count() >= 2);
    assert!(run.is_running());
}

#[test]
fn already_finished_tasks_return_without_any_refresh() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "finished");

    run.wait_for_completion(TIMEOUT, POLL).unwrap();
    // Only the creation call; no GET was issued.
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn skipped_state_becomes_task_aborted() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "running");

    transport.push_json(run_payload("skipped"));

    let err = run.wait_for_completion(TIMEOUT, POLL).unwrap_err();
    match err {
        HubApiError::TaskAborted { kind, state } => {
            assert_eq!(kind, "evaluation run");
            assert_eq!(state, "skipped");
        }
        other => panic!("expected TaskAborted, got {other:?}"),
    }
}

#[test]
fn missing_progress_becomes_task_aborted() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "running");

    // The refresh returns a payload with no status block at all.
    transport.push_json(json!({"id": "run-1"}));

    let err = run.wait_for_completion(TIMEOUT, POLL).unwrap_err();
    assert!(matches!(
        err,
        HubApiError::TaskAborted { state, .. } if state == "unknown"
    ));
}

#[test]
fn transport_errors_propagate_and_stop_the_wait() {
    let (client, transport) = common::client();
    let mut run = launched_run(&client, &transport, "running");

    transport.push_error(HubApiError::Api {
        status: 500,
        message: "internal error".into(),
        response_text: String::new(),
    });

    let err = run.wait_for_completion(TIMEOUT, POLL).unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn refresh_on_a_detached_run_makes_no_network_call() {
    let mut run = hub_client::EvaluationRun::default();
    let err = run.refresh().unwrap_err();
    assert!(matches!(err, HubApiError::DetachedEntity { .. }));
}

#[test]
fn predicates_are_pure_reads_of_the_cached_progress() {
    let (client, transport) = common::client();
    let run = launched_run(&client, &transport, "running");
    assert!(run.is_running());
    assert!(!run.is_finished());
    assert!(!run.is_errored());
    assert_eq!(
        run.progress.as_ref().map(|p| p.status),
        Some(TaskStatus::Running)
    );
    // No refresh happened for any of this.
    assert_eq!(transport.call_count(), 1);
}
