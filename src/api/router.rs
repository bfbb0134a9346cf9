use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_loan, get_loan_by_id, health_check, list_loans, return_loan,
};

/// Creates the API router with all loan endpoints
///
/// - POST /loans - Create a new loan
/// - GET /loans - List all loans
/// - GET /loans/:id - Get loan details
/// - POST /loans/:id/return - Return a book
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/:id", get(get_loan_by_id))
        .route("/loans/:id/return", post(return_loan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
