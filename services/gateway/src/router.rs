use crate::handlers::{account, admin, auth, transaction};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", post(auth::verify))
        .route("/logout", post(auth::logout))
        .route(
            "/account",
            get(account::get_account).delete(account::delete_account),
        )
        .route("/account/history", get(account::get_history))
        .route("/profile", put(account::update_profile))
        .route("/deposit", post(transaction::deposit))
        .route("/withdraw", post(transaction::withdraw))
        .route("/admin/status", post(admin::set_status))
        .route("/admin/accounts", get(admin::list_accounts))
        .route("/admin/stats", get(admin::stats));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
