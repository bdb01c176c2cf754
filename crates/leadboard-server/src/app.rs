use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use leadboard_core::config::AuthMode;

use crate::{auth, routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Report routes sit behind the session middleware unless authentication is
/// disabled. Outer layers, outermost first:
///
/// 1. `TraceLayer`: request/response spans via `tracing`.
/// 2. `CorsLayer`: the configured origins with credentials, or permissive
///    without credentials when none are configured.
pub fn build_app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/clients", get(routes::clients::list_clients))
        .route("/api/top-metrics", get(routes::summary::top_metrics))
        .route(
            "/api/top-metrics/export",
            get(routes::export::export_top_metrics),
        )
        .route("/api/qualified-leads", get(routes::leads::qualified_leads))
        .route("/api/googleads-qlead", get(routes::google_ads::googleads_qlead))
        .route("/api/googleads-qleads", get(routes::google_ads::googleads_qlead))
        .route(
            "/api/google-ads-qlead-metrics",
            get(routes::google_ads::google_ads_qlead_metrics),
        )
        .route("/api/ppl-data", get(routes::ppl::ppl_data))
        .route(
            "/api/lead_quality_by_source",
            get(routes::lead_quality::lead_quality_by_source),
        )
        .route(
            "/api/lead_quality_page",
            get(routes::lead_quality::lead_quality_page),
        )
        .route("/api/bedbug_composit", get(routes::composite::bedbug_composit))
        .route(
            "/api/cost-line-chart",
            get(routes::line_charts::cost_line_chart),
        )
        .route(
            "/api/get-qleadvolume-linechart",
            get(routes::line_charts::qlead_volume_line_chart),
        )
        .route(
            "/api/get-qleadcostper-linechart",
            get(routes::line_charts::qlead_cost_per_line_chart),
        );

    let protected = match state.config.auth_mode {
        AuthMode::None => protected,
        AuthMode::Password { .. } => protected.route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::middleware::require_session,
        )),
    };

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/login", post(auth::handlers::login))
        .route("/api/logout", post(auth::handlers::logout))
        .route("/api/auth/session", get(auth::handlers::session))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
