//! Run manager for coordinating concurrent pipeline runs.
//!
//! The RunManager owns a sequencer and spawns one background task per run.
//! Concurrent runs share only the immutable pipeline definition; each run
//! owns its context. Cancellation tokens are tracked per run id so a run can
//! be cancelled while in flight.

use crate::engine::{EngineError, Sequencer};
use crate::state::cancel::CancelToken;
use ck_protocol::content_models::ContentRecord;
use ck_protocol::events::Event;
use ck_protocol::run_models::Run;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// Manages all pipeline runs started through it.
pub struct RunManager {
    /// Finished runs, indexed by their id.
    runs: Arc<Mutex<HashMap<Uuid, Run>>>,

    /// Cancellation tokens for runs still in flight.
    cancels: Arc<Mutex<HashMap<Uuid, CancelToken>>>,

    /// The engine executing pipelines.
    sequencer: Arc<Sequencer>,

    /// Channel for sending events to the caller.
    events_tx: mpsc::Sender<Event>,
}

impl RunManager {
    pub fn new(sequencer: Sequencer, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            runs: Arc::new(Mutex::new(HashMap::new())),
            cancels: Arc::new(Mutex::new(HashMap::new())),
            sequencer: Arc::new(sequencer),
            events_tx,
        }
    }

    /// Start executing a pipeline in the background.
    ///
    /// The run id is returned immediately; progress arrives through the
    /// events channel and the final [`Run`] becomes available from
    /// [`RunManager::get_run`] once the run finishes.
    pub async fn start_run(&self, pipeline_name: &str, content: ContentRecord) -> Uuid {
        let run_id = Uuid::new_v4();
        let cancel = CancelToken::new();
        self.cancels.lock().await.insert(run_id, cancel.clone());

        let sequencer = Arc::clone(&self.sequencer);
        let runs = Arc::clone(&self.runs);
        let cancels = Arc::clone(&self.cancels);
        let events_tx = self.events_tx.clone();
        let pipeline_name = pipeline_name.to_string();

        tokio::spawn(async move {
            match sequencer
                .run_with_id(run_id, &pipeline_name, content, events_tx, cancel)
                .await
            {
                Ok(run) => {
                    runs.lock().await.insert(run_id, run);
                }
                Err(e) => {
                    tracing::error!(%run_id, error = %e, "run failed to start");
                }
            }
            cancels.lock().await.remove(&run_id);
        });

        run_id
    }

    /// Raise the cancellation signal for an in-flight run.
    ///
    /// The sequencer checks the signal between steps, so the run stops
    /// scheduling further steps and finishes with a partial context.
    pub async fn cancel_run(&self, run_id: Uuid) -> Result<(), EngineError> {
        match self.cancels.lock().await.get(&run_id) {
            Some(token) => {
                token.cancel();
                Ok(())
            }
            None => Err(EngineError::UnknownRun(run_id)),
        }
    }

    /// The final state of a finished run, if available.
    pub async fn get_run(&self, run_id: Uuid) -> Option<Run> {
        self.runs.lock().await.get(&run_id).cloned()
    }

    /// All finished runs.
    pub async fn all_runs(&self) -> Vec<Run> {
        self.runs.lock().await.values().cloned().collect()
    }

    /// Number of finished runs.
    pub async fn run_count(&self) -> usize {
        self.runs.lock().await.len()
    }
}
