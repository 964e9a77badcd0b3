//! Run state machine implementation.
//!
//! This module provides functions for managing the lifecycle of a [`Run`],
//! including state transitions and event emission.

use chrono::Utc;
use ck_protocol::content_models::ContentRecord;
use ck_protocol::events::Event;
use ck_protocol::run_models::{Run, RunContext, RunStatus};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Create a new Run with Pending status and a fresh context around the
/// content record.
pub fn create_run(id: Uuid, pipeline_name: &str, content: ContentRecord) -> Run {
    Run {
        id,
        pipeline_name: pipeline_name.to_string(),
        content_id: content.id.clone(),
        status: RunStatus::Pending,
        current_step: 0,
        halted_at: None,
        steps: Vec::new(),
        logs: Vec::new(),
        started_at: Utc::now(),
        completed_at: None,
        context: RunContext::new(content),
    }
}

/// Transition the run to Running status and emit event.
pub async fn start_run(run: &mut Run, events_tx: &Sender<Event>) {
    run.status = RunStatus::Running;
    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status: run.status,
            step_index: run.current_step,
        })
        .await;
}

/// Mark the run as completed and emit events.
pub async fn complete_run(run: &mut Run, events_tx: &Sender<Event>) {
    run.status = RunStatus::Completed;
    run.completed_at = Some(Utc::now());
    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status: run.status,
            step_index: run.current_step,
        })
        .await;
    let _ = events_tx.send(Event::RunCompleted { run_id: run.id }).await;
}

/// Mark the run as failed and emit error events.
pub async fn fail_run(run: &mut Run, events_tx: &Sender<Event>, error: String) {
    run.status = RunStatus::Failed;
    run.completed_at = Some(Utc::now());
    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status: run.status,
            step_index: run.current_step,
        })
        .await;
    let _ = events_tx
        .send(Event::RunError {
            run_id: run.id,
            error,
        })
        .await;
}

/// Mark the run as cancelled and emit events. The context stays partial.
pub async fn cancel_run(run: &mut Run, events_tx: &Sender<Event>) {
    run.status = RunStatus::Cancelled;
    run.completed_at = Some(Utc::now());
    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status: run.status,
            step_index: run.current_step,
        })
        .await;
    let _ = events_tx.send(Event::RunCancelled { run_id: run.id }).await;
}

/// Append a log message to the run logs and emit event.
pub async fn log_to_run(run: &mut Run, events_tx: &Sender<Event>, message: String) {
    run.logs.push(message.clone());
    let _ = events_tx
        .send(Event::RunLogChunk {
            run_id: run.id,
            content: message,
        })
        .await;
}

/// Move to the next resolved step.
pub fn advance_step(run: &mut Run) {
    run.current_step += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_protocol::content_models::{ContentPayload, ContentRecord};
    use tokio::sync::mpsc;

    fn test_content() -> ContentRecord {
        ContentRecord::new(
            "c-1",
            ContentPayload::BlogPost {
                author: None,
                tags: vec![],
                category: None,
            },
        )
    }

    #[tokio::test]
    async fn test_create_run() {
        let run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        assert_eq!(run.pipeline_name, "test-pipeline");
        assert_eq!(run.content_id, "c-1");
        assert_eq!(run.status, RunStatus::Pending);
        assert_eq!(run.current_step, 0);
        assert!(run.logs.is_empty());
        assert!(run.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_start_run() {
        let mut run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        let (tx, mut rx) = mpsc::channel(10);

        start_run(&mut run, &tx).await;

        assert_eq!(run.status, RunStatus::Running);

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            Event::RunStatusUpdate {
                status: RunStatus::Running,
                step_index: 0,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_complete_run() {
        let mut run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        let (tx, mut rx) = mpsc::channel(10);

        complete_run(&mut run, &tx).await;

        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.completed_at.is_some());

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            Event::RunStatusUpdate {
                status: RunStatus::Completed,
                ..
            }
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, Event::RunCompleted { .. }));
    }

    #[tokio::test]
    async fn test_fail_run() {
        let mut run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        let (tx, mut rx) = mpsc::channel(10);

        fail_run(&mut run, &tx, "Test error".to_string()).await;

        assert_eq!(run.status, RunStatus::Failed);

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            Event::RunStatusUpdate {
                status: RunStatus::Failed,
                ..
            }
        ));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, Event::RunError { error, .. } if error == "Test error"));
    }

    #[tokio::test]
    async fn test_cancel_run() {
        let mut run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        let (tx, mut rx) = mpsc::channel(10);

        cancel_run(&mut run, &tx).await;

        assert_eq!(run.status, RunStatus::Cancelled);
        assert!(run.cancelled());

        let _ = rx.recv().await.unwrap();
        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, Event::RunCancelled { .. }));
    }

    #[tokio::test]
    async fn test_log_to_run() {
        let mut run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        let (tx, mut rx) = mpsc::channel(10);

        log_to_run(&mut run, &tx, "Test log message".to_string()).await;

        assert_eq!(run.logs.len(), 1);
        assert_eq!(run.logs[0], "Test log message");

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            Event::RunLogChunk { content, .. } if content == "Test log message"
        ));
    }

    #[tokio::test]
    async fn test_advance_step() {
        let mut run = create_run(Uuid::new_v4(), "test-pipeline", test_content());
        assert_eq!(run.current_step, 0);

        advance_step(&mut run);
        assert_eq!(run.current_step, 1);

        advance_step(&mut run);
        assert_eq!(run.current_step, 2);
    }
}
