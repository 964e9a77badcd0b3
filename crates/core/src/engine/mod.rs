//! Pipeline execution engine.
//!
//! The [`Sequencer`] executes one pipeline against one content record:
//! it expands branching steps into sub-pipelines, resolves each step's input
//! from the run context, invokes the registered task through the harness
//! (with timeout and retry), and records outcomes into the run report.
//!
//! Failure is step-local: a failed step stops the remainder of its own
//! (sub-)pipeline branch, while subsequent top-level steps still execute
//! when their inputs allow. Steps whose required inputs never materialize
//! are skipped without being invoked, so a failure whose output every
//! remaining step depends on terminates the whole run.

pub mod flow;
pub mod router;

use crate::config::models::PipelineDefinition;
use crate::engine::flow::{DataFlowManager, FlowError};
use crate::engine::router::BranchingRouter;
use crate::state::cancel::CancelToken;
use crate::state::run::{
    advance_step, cancel_run, complete_run, create_run, fail_run, log_to_run, start_run,
};
use crate::tasks::harness::run_task;
use crate::tasks::registry::TaskRegistry;
use ck_protocol::config_models::EngineSettings;
use ck_protocol::content_models::ContentRecord;
use ck_protocol::events::Event;
use ck_protocol::run_models::{Run, StepOutcome, StepReport};
use ck_protocol::task_models::{ErrorCode, TaskMetadata, TaskResult};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Errors surfaced before any step executes.
///
/// Everything that can go wrong during execution is recovered into the run
/// report instead; only addressing mistakes reach the caller as errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The named pipeline does not exist in the loaded definition.
    #[error("Unknown pipeline '{0}'")]
    UnknownPipeline(String),

    /// The run id is not tracked by this manager.
    #[error("Unknown run {0}")]
    UnknownRun(Uuid),

    /// Loosely-typed input could not be normalized into a content record.
    #[error(transparent)]
    Content(#[from] crate::content::normalize::ContentError),
}

/// The main pipeline execution engine.
///
/// A sequencer is cheap to share: the definition is immutable after load and
/// every run owns its own context, so concurrent `run` calls never interfere.
pub struct Sequencer {
    definition: Arc<PipelineDefinition>,
    registry: TaskRegistry,
    settings: EngineSettings,
    flow: DataFlowManager,
    router: BranchingRouter,
}

impl Sequencer {
    /// Create a new Sequencer over a loaded definition and task registry.
    pub fn new(
        definition: Arc<PipelineDefinition>,
        registry: TaskRegistry,
        settings: EngineSettings,
    ) -> Self {
        let flow = DataFlowManager::new(Arc::clone(&definition));
        let router = BranchingRouter::new(Arc::clone(&definition));
        Self {
            definition,
            registry,
            settings,
            flow,
            router,
        }
    }

    /// The definition this sequencer executes against.
    pub fn definition(&self) -> &PipelineDefinition {
        &self.definition
    }

    /// Execute the named pipeline against one content record.
    ///
    /// Returns the final [`Run`] (including its context) or an error when the
    /// pipeline name is unknown. Step failures never surface as errors; they
    /// are recorded in the run report.
    pub async fn run(
        &self,
        pipeline_name: &str,
        content: ContentRecord,
        events_tx: Sender<Event>,
        cancel: CancelToken,
    ) -> Result<Run, EngineError> {
        self.run_with_id(Uuid::new_v4(), pipeline_name, content, events_tx, cancel)
            .await
    }

    /// Execute against a loosely-typed record (a JSON object), normalizing
    /// it into the canonical content shape first.
    pub async fn run_loose(
        &self,
        pipeline_name: &str,
        content: serde_json::Value,
        events_tx: Sender<Event>,
        cancel: CancelToken,
    ) -> Result<Run, EngineError> {
        let record = crate::content::normalize::normalize_record(content)?;
        self.run(pipeline_name, record, events_tx, cancel).await
    }

    /// Execute with a caller-supplied run id, so callers can track the run
    /// (e.g. for cancellation) before it completes.
    pub async fn run_with_id(
        &self,
        run_id: Uuid,
        pipeline_name: &str,
        content: ContentRecord,
        events_tx: Sender<Event>,
        cancel: CancelToken,
    ) -> Result<Run, EngineError> {
        let steps = self
            .definition
            .pipeline(pipeline_name)
            .ok_or_else(|| EngineError::UnknownPipeline(pipeline_name.to_string()))?;

        let mut run = create_run(run_id, pipeline_name, content);

        let _ = events_tx
            .send(Event::RunStarted {
                run_id: run.id,
                pipeline_name: pipeline_name.to_string(),
                content_id: run.content_id.clone(),
            })
            .await;

        start_run(&mut run, &events_tx).await;

        let kind = run.context.content.kind();
        let mut first_resolved = true;

        'pipeline: for step in steps {
            if cancel.is_cancelled() {
                log_to_run(&mut run, &events_tx, "Cancellation requested".to_string()).await;
                cancel_run(&mut run, &events_tx).await;
                return Ok(run);
            }

            match self.router.expand(step, kind) {
                Some(sub_steps) => {
                    log_to_run(
                        &mut run,
                        &events_tx,
                        format!(
                            "Expanding step '{}' into sub-pipeline ({} steps)",
                            step,
                            sub_steps.len()
                        ),
                    )
                    .await;

                    for sub_step in sub_steps {
                        if cancel.is_cancelled() {
                            log_to_run(&mut run, &events_tx, "Cancellation requested".to_string())
                                .await;
                            cancel_run(&mut run, &events_tx).await;
                            return Ok(run);
                        }

                        let ok = self
                            .execute_step(sub_step, &mut run, &events_tx, &mut first_resolved)
                            .await;
                        if !ok {
                            // Stop the remainder of this branch; siblings at
                            // the top level still get their chance.
                            continue 'pipeline;
                        }
                    }
                }
                None => {
                    self.execute_step(step, &mut run, &events_tx, &mut first_resolved)
                        .await;
                }
            }
        }

        let halted = run
            .steps
            .iter()
            .find(|s| !s.outcome.succeeded())
            .map(|report| {
                let error = match &report.outcome {
                    StepOutcome::Failed { error, .. } => error.clone(),
                    StepOutcome::Skipped { missing_key } => {
                        format!("missing required input key '{}'", missing_key)
                    }
                    StepOutcome::Succeeded => String::new(),
                };
                (report.step.clone(), error)
            });

        match halted {
            None => complete_run(&mut run, &events_tx).await,
            Some((step, error)) => {
                fail_run(
                    &mut run,
                    &events_tx,
                    format!("Step '{}' halted the run: {}", step, error),
                )
                .await;
            }
        }

        Ok(run)
    }

    /// Execute a single resolved step. Returns whether the step succeeded.
    async fn execute_step(
        &self,
        step: &str,
        run: &mut Run,
        events_tx: &Sender<Event>,
        first_resolved: &mut bool,
    ) -> bool {
        if *first_resolved {
            *first_resolved = false;
        } else {
            advance_step(run);
        }

        let input = match self.flow.resolve_input(step, &run.context) {
            Ok(input) => input,
            Err(FlowError::MissingInput { key, .. }) => {
                log_to_run(
                    run,
                    events_tx,
                    format!("Skipping step '{}': missing required input key '{}'", step, key),
                )
                .await;
                let _ = events_tx
                    .send(Event::StepSkipped {
                        run_id: run.id,
                        step: step.to_string(),
                        missing_key: key.clone(),
                    })
                    .await;

                let metadata = TaskMetadata::from_record(&run.context.content);
                let result = TaskResult::failed(
                    step,
                    format!("missing required input key '{}'", key),
                    ErrorCode::Validation,
                    false,
                    metadata,
                );
                self.flow.record_failure(step, &mut run.context, result);
                self.push_report(run, step, StepOutcome::Skipped { missing_key: key }, 0);
                return false;
            }
            Err(err @ FlowError::DuplicateKey { .. }) => {
                return self
                    .record_step_failure(run, events_tx, step, err.to_string(), 0)
                    .await;
            }
        };

        log_to_run(run, events_tx, format!("Executing step: {}", step)).await;
        let _ = events_tx
            .send(Event::StepStarted {
                run_id: run.id,
                step: step.to_string(),
            })
            .await;

        let Some(task) = self.registry.get(step) else {
            // Branching covered other subtypes only and the leaf has no task.
            return self
                .record_step_failure(
                    run,
                    events_tx,
                    step,
                    format!("no task registered for step '{}'", step),
                    0,
                )
                .await;
        };

        let timeout = Duration::from_secs(self.settings.step_timeout_secs);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempts = 0u32;
        let result = loop {
            attempts += 1;
            let result = run_task(task.as_ref(), &run.context.content, input.clone(), timeout).await;
            if result.success || !result.retryable || attempts >= max_attempts {
                break result;
            }

            let delay = self.settings.backoff_ms.saturating_mul(1u64 << (attempts - 1));
            log_to_run(
                run,
                events_tx,
                format!(
                    "Step '{}' failed (attempt {}/{}), retrying in {}ms",
                    step, attempts, max_attempts, delay
                ),
            )
            .await;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        };

        if result.success {
            match self.flow.record_output(step, &mut run.context, result) {
                Ok(()) => {
                    self.push_report(run, step, StepOutcome::Succeeded, attempts);
                    log_to_run(run, events_tx, format!("Step {} completed", step)).await;
                    let _ = events_tx
                        .send(Event::StepCompleted {
                            run_id: run.id,
                            step: step.to_string(),
                        })
                        .await;
                    true
                }
                Err(err) => {
                    self.record_step_failure(run, events_tx, step, err.to_string(), attempts)
                        .await
                }
            }
        } else {
            let error = result.error.clone().unwrap_or_default();
            let code = result.error_code.unwrap_or(ErrorCode::Execution);
            self.flow.record_failure(step, &mut run.context, result);
            self.push_report(run, step, StepOutcome::Failed { error: error.clone(), code }, attempts);

            log_to_run(run, events_tx, format!("Step '{}' failed: {}", step, error)).await;
            let _ = events_tx
                .send(Event::StepFailed {
                    run_id: run.id,
                    step: step.to_string(),
                    error,
                })
                .await;
            false
        }
    }

    /// Record an engine-side step failure (no task result available).
    async fn record_step_failure(
        &self,
        run: &mut Run,
        events_tx: &Sender<Event>,
        step: &str,
        error: String,
        attempts: u32,
    ) -> bool {
        let metadata = TaskMetadata::from_record(&run.context.content);
        let result = TaskResult::failed(step, error.clone(), ErrorCode::Execution, false, metadata);
        self.flow.record_failure(step, &mut run.context, result);
        self.push_report(
            run,
            step,
            StepOutcome::Failed {
                error: error.clone(),
                code: ErrorCode::Execution,
            },
            attempts,
        );

        log_to_run(run, events_tx, format!("Step '{}' failed: {}", step, error)).await;
        let _ = events_tx
            .send(Event::StepFailed {
                run_id: run.id,
                step: step.to_string(),
                error,
            })
            .await;
        false
    }

    fn push_report(&self, run: &mut Run, step: &str, outcome: StepOutcome, attempts: u32) {
        if run.halted_at.is_none() && !outcome.succeeded() {
            run.halted_at = Some(step.to_string());
        }
        run.steps.push(StepReport {
            step: step.to_string(),
            outcome,
            attempts,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_protocol::content_models::{ContentPayload, ContentRecord};
    use ck_protocol::pipeline_models::{BranchingTable, FlowTable, PipelineSpec};
    use ck_protocol::run_models::RunStatus;
    use tokio::sync::mpsc;

    fn test_content() -> ContentRecord {
        let mut record = ContentRecord::new(
            "post-1",
            ContentPayload::BlogPost {
                author: None,
                tags: vec![],
                category: None,
            },
        );
        record.title = Some("Pipeline automation".to_string());
        record.body = Some("Pipeline automation keeps content work flowing smoothly.".to_string());
        record
    }

    fn simple_definition() -> Arc<PipelineDefinition> {
        Arc::new(PipelineDefinition::assemble(
            vec![PipelineSpec {
                name: "quick".to_string(),
                steps: vec!["extract_keywords".to_string()],
            }],
            FlowTable::default(),
            BranchingTable::default(),
        ))
    }

    fn sequencer(definition: Arc<PipelineDefinition>) -> Sequencer {
        Sequencer::new(definition, TaskRegistry::builtin(), EngineSettings::default())
    }

    #[tokio::test]
    async fn test_sequencer_simple_execution() {
        let engine = sequencer(simple_definition());
        let (tx, _rx) = mpsc::channel(100);

        let run = engine
            .run("quick", test_content(), tx, CancelToken::new())
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.succeeded());
        assert_eq!(run.pipeline_name, "quick");
        assert!(run.context.value("extract_keywords").is_some());
        assert!(run.halted_at.is_none());
    }

    #[tokio::test]
    async fn test_sequencer_unknown_pipeline() {
        let engine = sequencer(simple_definition());
        let (tx, _rx) = mpsc::channel(100);

        let result = engine
            .run("nonexistent", test_content(), tx, CancelToken::new())
            .await;

        assert!(matches!(result, Err(EngineError::UnknownPipeline(name)) if name == "nonexistent"));
    }

    #[tokio::test]
    async fn test_sequencer_event_emission() {
        let engine = sequencer(simple_definition());
        let (tx, mut rx) = mpsc::channel(100);

        let handle = tokio::spawn(async move {
            engine
                .run("quick", test_content(), tx, CancelToken::new())
                .await
        });

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let is_completed = matches!(event, Event::RunCompleted { .. });
            events.push(event);
            if is_completed {
                break;
            }
        }

        assert!(matches!(&events[0], Event::RunStarted { .. }));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::RunStatusUpdate {
                status: RunStatus::Running,
                ..
            }
        )));
        assert!(events.iter().any(|e| matches!(e, Event::StepStarted { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::StepCompleted { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::RunLogChunk { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::RunCompleted { .. })));

        let _ = handle.await;
    }

    #[tokio::test]
    async fn test_run_loose_normalizes_input() {
        let engine = sequencer(simple_definition());
        let (tx, _rx) = mpsc::channel(100);

        let run = engine
            .run_loose(
                "quick",
                serde_json::json!({
                    "id": "loose-1",
                    "title": "Loose input",
                    "content": "Automation handles loosely typed records too.",
                    "author": "Dana",
                }),
                tx,
                CancelToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.content_id, "loose-1");
    }

    #[tokio::test]
    async fn test_run_loose_rejects_unnormalizable_input() {
        let engine = sequencer(simple_definition());
        let (tx, _rx) = mpsc::channel(100);

        let result = engine
            .run_loose(
                "quick",
                serde_json::json!({"title": "no id"}),
                tx,
                CancelToken::new(),
            )
            .await;

        assert!(matches!(result, Err(EngineError::Content(_))));
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_returns_partial() {
        let engine = sequencer(simple_definition());
        let (tx, _rx) = mpsc::channel(100);
        let cancel = CancelToken::new();
        cancel.cancel();

        let run = engine.run("quick", test_content(), tx, cancel).await.unwrap();

        assert_eq!(run.status, RunStatus::Cancelled);
        assert!(run.steps.is_empty(), "no step runs after cancellation");
    }
}
