//! Mock task implementations for deterministic testing.

use async_trait::async_trait;
use ck_core::tasks::base::{PluginTask, TaskError};
use ck_protocol::content_models::ContentRecord;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A mock task that always succeeds with a predefined payload and records
/// how it was invoked.
pub struct MockSuccessTask {
    pub name: String,
    pub data: Value,
    pub invocations: Arc<AtomicUsize>,
    pub last_input: Arc<Mutex<Option<Value>>>,
}

impl MockSuccessTask {
    pub fn new(name: &str, data: Value) -> Self {
        Self {
            name: name.to_string(),
            data,
            invocations: Arc::new(AtomicUsize::new(0)),
            last_input: Arc::new(Mutex::new(None)),
        }
    }

    #[allow(dead_code)]
    pub fn probes(&self) -> (Arc<AtomicUsize>, Arc<Mutex<Option<Value>>>) {
        (Arc::clone(&self.invocations), Arc::clone(&self.last_input))
    }
}

#[async_trait]
impl PluginTask for MockSuccessTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        _content: &ContentRecord,
        input: Option<Value>,
    ) -> Result<Value, TaskError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = input;
        Ok(self.data.clone())
    }
}

/// A mock task that always fails with a predefined error.
pub struct MockFailureTask {
    pub name: String,
    pub error: TaskError,
    pub invocations: Arc<AtomicUsize>,
}

impl MockFailureTask {
    pub fn new(name: &str, error: TaskError) -> Self {
        Self {
            name: name.to_string(),
            error,
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn invocations(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }
}

#[async_trait]
impl PluginTask for MockFailureTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        _content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// A mock task that fails with a retryable error a fixed number of times
/// before succeeding.
pub struct FlakyTask {
    pub name: String,
    pub failures_before_success: usize,
    pub invocations: Arc<AtomicUsize>,
}

impl FlakyTask {
    pub fn new(name: &str, failures_before_success: usize) -> Self {
        Self {
            name: name.to_string(),
            failures_before_success,
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn invocations(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }
}

#[async_trait]
impl PluginTask for FlakyTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        _content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let attempt = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures_before_success {
            Err(TaskError::retryable(format!("transient fault on attempt {}", attempt)))
        } else {
            Ok(serde_json::json!({"attempt": attempt}))
        }
    }
}

/// A mock task that cancels a run token while executing, so the sequencer
/// observes cancellation at the next between-steps check.
pub struct CancellingTask {
    pub name: String,
    pub token: ck_core::state::CancelToken,
}

impl CancellingTask {
    #[allow(dead_code)]
    pub fn new(name: &str, token: ck_core::state::CancelToken) -> Self {
        Self {
            name: name.to_string(),
            token,
        }
    }
}

#[async_trait]
impl PluginTask for CancellingTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        _content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        self.token.cancel();
        Ok(serde_json::json!({"cancelled_by": self.name}))
    }
}
