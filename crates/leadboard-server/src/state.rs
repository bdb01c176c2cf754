use std::sync::Arc;

use leadboard_core::{config::Config, rpc::RpcBackend};

/// Shared application state injected into every handler via
/// [`axum::extract::State`]. Nothing in it is mutated after startup.
pub struct AppState {
    /// Where every report's rows come from.
    pub backend: Arc<dyn RpcBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// HMAC secret for session tokens.
    pub session_secret: String,
}

impl AppState {
    /// Uses the configured session secret, or a random one for this process.
    pub fn new(backend: Arc<dyn RpcBackend>, config: Config) -> Self {
        let session_secret = config
            .session_secret
            .clone()
            .unwrap_or_else(crate::auth::jwt::random_secret);
        Self {
            backend,
            config: Arc::new(config),
            session_secret,
        }
    }
}
