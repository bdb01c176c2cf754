/// Re-export `Config` from `leadboard-core` for use within this crate.
///
/// Environment parsing lives in `leadboard-core` so integration tests can
/// build a config without the server.
pub use leadboard_core::config::{AuthMode, Config};
