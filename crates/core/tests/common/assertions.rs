//! Custom assertion helpers for integration tests.

use ck_protocol::events::Event;
use ck_protocol::run_models::{Run, RunStatus, StepOutcome};

/// The resolved step names in execution order.
pub fn executed_steps(run: &Run) -> Vec<&str> {
    run.steps.iter().map(|s| s.step.as_str()).collect()
}

/// Whether the run report marks a step with the given outcome kind.
#[allow(dead_code)]
pub fn step_succeeded(run: &Run, step: &str) -> bool {
    run.steps
        .iter()
        .any(|s| s.step == step && matches!(s.outcome, StepOutcome::Succeeded))
}

#[allow(dead_code)]
pub fn step_skipped(run: &Run, step: &str) -> bool {
    run.steps
        .iter()
        .any(|s| s.step == step && matches!(s.outcome, StepOutcome::Skipped { .. }))
}

/// Assert that a sequence of events contains a RunCompleted event.
#[allow(dead_code)]
pub fn has_run_completed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::RunCompleted { .. }))
}

/// Assert that a sequence of events contains a status update with the given
/// status.
#[allow(dead_code)]
pub fn has_status_update(events: &[Event], status: RunStatus) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            Event::RunStatusUpdate { status: s, .. } if *s == status
        )
    })
}

/// Assert that a step was reported as started through the event channel.
#[allow(dead_code)]
pub fn has_step_started(events: &[Event], step: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::StepStarted { step: s, .. } if s == step))
}
