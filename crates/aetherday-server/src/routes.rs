use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{handlers, AppState};

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/profile", get(handlers::get_profile))
        .route("/profile/workday", put(handlers::set_workday))
        .route("/energy/regen", post(handlers::regen_all))
        .route("/energy/regen/me", post(handlers::regen_me))
        .route("/energy/pod-exit", post(handlers::pod_exit))
        .route("/challenge/refresh", post(handlers::refresh_challenge))
        .route("/challenge/claim", post(handlers::claim_reward))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/{id}/complete", post(handlers::complete_task))
        .route("/tasks/{id}/sink", post(handlers::sink_task))
        .route("/tasks/{id}/retire", post(handlers::retire_task))
        .route("/retired", get(handlers::list_retired))
        .route("/sink", get(handlers::list_sink))
        .route("/sink/restore", post(handlers::restore_sink))
        .route("/sink/{id}/schedule", post(handlers::schedule_sink_task))
        .route("/schedule/auto-balance", post(handlers::auto_balance));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
