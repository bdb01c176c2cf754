use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use leadboard_core::rpc::{RpcBackend, RpcError, RpcParams};

/// HTTP client for a PostgREST endpoint (Supabase's `/rest/v1`).
///
/// Stored procedures are invoked with `POST /rpc/<name>` and a JSON object of
/// named arguments; tables are read with `GET /<table>?select=...`. The
/// service key is sent both as `apikey` and as the bearer token.
#[derive(Clone)]
pub struct PostgrestBackend {
    client: Client,
    rest_url: String,
    service_key: String,
}

/// Error body PostgREST returns with non-2xx responses.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl PostgrestBackend {
    pub fn new(base_url: &str, service_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build PostgREST HTTP client")?;
        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            service_key: service_key.to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, target: &str, request: RequestBuilder) -> Result<Vec<Value>, RpcError> {
        let transport = |e: reqwest::Error| RpcError::Transport {
            function: target.to_string(),
            message: e.to_string(),
        };

        let resp = self.authorized(request).send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;

        if !status.is_success() {
            let message = match serde_json::from_str::<PostgrestErrorBody>(&body) {
                Ok(PostgrestErrorBody {
                    message: Some(message),
                    code,
                    details,
                    hint,
                }) => {
                    tracing::warn!(
                        target_name = target,
                        status = status.as_u16(),
                        code = code.as_deref().unwrap_or_default(),
                        details = details.as_deref().unwrap_or_default(),
                        hint = hint.as_deref().unwrap_or_default(),
                        "PostgREST rejected request"
                    );
                    message
                }
                _ => body,
            };
            return Err(RpcError::Remote {
                function: target.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: Value = serde_json::from_str(&body).map_err(|source| RpcError::Decode {
            function: target.to_string(),
            source,
        })?;
        Ok(match value {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            row => vec![row],
        })
    }
}

#[async_trait]
impl RpcBackend for PostgrestBackend {
    async fn call(&self, function: &str, params: &RpcParams) -> Result<Vec<Value>, RpcError> {
        let url = format!("{}/rpc/{function}", self.rest_url);
        tracing::debug!(function, "Calling stored procedure");
        let request = self.client.post(url).json(params.values());
        self.send(function, request).await
    }

    async fn select(&self, table: &str, columns: &[&str]) -> Result<Vec<Value>, RpcError> {
        let url = format!("{}/{table}", self.rest_url);
        let request = self.client.get(url).query(&[("select", columns.join(","))]);
        self.send(table, request).await
    }

    async fn ping(&self) -> Result<(), RpcError> {
        let request = self.client.get(format!("{}/", self.rest_url));
        self.send("ping", request).await.map(|_| ())
    }
}
