use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{RpcBackend, RpcError, RpcParams};

#[derive(Debug, Clone)]
enum Canned {
    Rows(Vec<Value>),
    Error(String),
}

/// A procedure invocation seen by [`MemoryRpcBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub function: String,
    pub params: Map<String, Value>,
}

/// In-process backend with canned results per procedure or table.
///
/// Procedures without a canned result return no rows, like a set-returning
/// function over an empty range. Every call is recorded.
#[derive(Debug)]
pub struct MemoryRpcBackend {
    functions: HashMap<String, Canned>,
    tables: HashMap<String, Canned>,
    healthy: AtomicBool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for MemoryRpcBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn into_rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        row => vec![row],
    }
}

impl MemoryRpcBackend {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            tables: HashMap::new(),
            healthy: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rows(mut self, function: &str, rows: Value) -> Self {
        self.functions
            .insert(function.to_string(), Canned::Rows(into_rows(rows)));
        self
    }

    pub fn with_error(mut self, function: &str, message: &str) -> Self {
        self.functions
            .insert(function.to_string(), Canned::Error(message.to_string()));
        self
    }

    pub fn with_table(mut self, table: &str, rows: Value) -> Self {
        self.tables
            .insert(table.to_string(), Canned::Rows(into_rows(rows)));
        self
    }

    pub fn with_table_error(mut self, table: &str, message: &str) -> Self {
        self.tables
            .insert(table.to_string(), Canned::Error(message.to_string()));
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn calls_to(&self, function: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.function == function)
            .collect()
    }

    fn answer(name: &str, canned: Option<&Canned>) -> Result<Vec<Value>, RpcError> {
        match canned {
            Some(Canned::Rows(rows)) => Ok(rows.clone()),
            Some(Canned::Error(message)) => Err(RpcError::Remote {
                function: name.to_string(),
                status: 400,
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl RpcBackend for MemoryRpcBackend {
    async fn call(&self, function: &str, params: &RpcParams) -> Result<Vec<Value>, RpcError> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(RecordedCall {
                function: function.to_string(),
                params: params.values().clone(),
            });
        Self::answer(function, self.functions.get(function))
    }

    async fn select(&self, table: &str, _columns: &[&str]) -> Result<Vec<Value>, RpcError> {
        Self::answer(table, self.tables.get(table))
    }

    async fn ping(&self) -> Result<(), RpcError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RpcError::Transport {
                function: "ping".to_string(),
                message: "backend marked unhealthy".to_string(),
            })
        }
    }
}
