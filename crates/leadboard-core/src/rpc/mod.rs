//! Stored-procedure calls against the managed database.
//!
//! Reports talk to the database only through [`RpcBackend`]; production uses
//! the PostgREST backend, tests use [`memory::MemoryRpcBackend`].

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::bucket::{bucket_key, Granularity};

#[derive(Debug, Error)]
pub enum RpcError {
    /// The database rejected the call. `message` is surfaced to API callers
    /// unchanged.
    #[error("{message}")]
    Remote {
        function: String,
        status: u16,
        message: String,
    },

    #[error("request to {function} failed: {message}")]
    Transport { function: String, message: String },

    #[error("unexpected row shape from {function}: {source}")]
    Decode {
        function: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Naming convention of a procedure's arguments. Older procedures take
/// `p_client_id`, newer ones `input_client_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    Input,
    Prefixed,
}

impl ParamStyle {
    fn prefix(&self) -> &'static str {
        match self {
            ParamStyle::Input => "input_",
            ParamStyle::Prefixed => "p_",
        }
    }
}

/// Named arguments of one procedure call, sent as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcParams {
    style: ParamStyle,
    values: Map<String, Value>,
}

impl RpcParams {
    pub fn new(style: ParamStyle) -> Self {
        Self {
            style,
            values: Map::new(),
        }
    }

    fn styled(mut self, name: &str, value: Value) -> Self {
        self.values
            .insert(format!("{}{name}", self.style.prefix()), value);
        self
    }

    pub fn client_id(self, client_id: i64) -> Self {
        self.styled("client_id", Value::from(client_id))
    }

    pub fn start_date(self, date: NaiveDate) -> Self {
        self.styled("start_date", Value::from(bucket_key(&date)))
    }

    pub fn end_date(self, date: NaiveDate) -> Self {
        self.styled("end_date", Value::from(bucket_key(&date)))
    }

    pub fn range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date(start).end_date(end)
    }

    pub fn group_by(self, granularity: Granularity) -> Self {
        self.styled("group_by", Value::from(granularity.as_str()))
    }

    /// The lead-quality procedures name the same argument `grouping`.
    pub fn grouping(self, granularity: Granularity) -> Self {
        self.styled("grouping", Value::from(granularity.as_str()))
    }

    /// Arbitrary argument, inserted verbatim (no style prefix).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

#[async_trait]
pub trait RpcBackend: Send + Sync + 'static {
    /// Invoke a stored procedure; a procedure returning a single row or
    /// nothing yields a one-element or empty list.
    async fn call(&self, function: &str, params: &RpcParams) -> Result<Vec<Value>, RpcError>;

    /// Read selected columns of every row in a table.
    async fn select(&self, table: &str, columns: &[&str]) -> Result<Vec<Value>, RpcError>;

    async fn ping(&self) -> Result<(), RpcError>;
}

fn decode_rows<T: DeserializeOwned>(function: &str, rows: Vec<Value>) -> Result<Vec<T>, RpcError> {
    rows.into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| RpcError::Decode {
            function: function.to_string(),
            source,
        })
}

/// Call a procedure and decode every row into `T`.
pub async fn call_typed<T: DeserializeOwned>(
    backend: &dyn RpcBackend,
    function: &str,
    params: &RpcParams,
) -> Result<Vec<T>, RpcError> {
    let rows = backend.call(function, params).await.map_err(|e| {
        tracing::error!(function, error = %e, "RPC call failed");
        e
    })?;
    tracing::debug!(function, rows = rows.len(), "RPC call returned");
    decode_rows(function, rows)
}

/// Call a single-row summary procedure; no rows decodes as `T::default()`.
pub async fn first_or_default<T: DeserializeOwned + Default>(
    backend: &dyn RpcBackend,
    function: &str,
    params: &RpcParams,
) -> Result<T, RpcError> {
    let rows: Vec<T> = call_typed(backend, function, params).await?;
    Ok(rows.into_iter().next().unwrap_or_default())
}

/// Read a table and decode every row into `T`.
pub async fn select_typed<T: DeserializeOwned>(
    backend: &dyn RpcBackend,
    table: &str,
    columns: &[&str],
) -> Result<Vec<T>, RpcError> {
    let rows = backend.select(table, columns).await.map_err(|e| {
        tracing::error!(table, error = %e, "table read failed");
        e
    })?;
    decode_rows(table, rows)
}
