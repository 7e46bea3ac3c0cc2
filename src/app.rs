use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/today", get(handlers::get_today))
        .route(
            "/api/entries",
            get(handlers::list_recent)
                .post(handlers::save_entry)
                .delete(handlers::delete_all),
        )
        .route("/api/entries/range", get(handlers::list_range))
        .route(
            "/api/entries/:date",
            get(handlers::get_entry).delete(handlers::delete_entry),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/moods", get(handlers::list_moods))
        .route("/api/activities", get(handlers::list_activities))
        .route("/api/export", get(handlers::export))
        .with_state(state)
}
