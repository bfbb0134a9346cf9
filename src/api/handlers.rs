use crate::application::loan::{
    ServiceDependencies, create_loan as execute_create_loan, get_loan as execute_get_loan,
    list_loans as execute_list_loans, return_loan as execute_return_loan,
};
use crate::domain::commands::RawId;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{CreateLoanRequest, LoanListResponse, LoanResponse},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /loans - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - book_id, member_id が正の整数であること
/// - 書籍と会員が存在すること
/// - 会員が同じ書籍の未返却の貸出を持っていないこと
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let Json(req) = payload?;
    let loan = execute_create_loan(&state.service_deps, req.to_command()).await?;

    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

/// POST /loans/:id/return - 書籍を返却
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること
/// - 既に返却済みでないこと（2回目の返却は409）
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = execute_return_loan(&state.service_deps, RawId::from(loan_id)).await?;

    Ok(Json(LoanResponse::from(loan)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /loans/:id - 貸出詳細をIDで取得
pub async fn get_loan_by_id(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = execute_get_loan(&state.service_deps, RawId::from(loan_id)).await?;

    Ok(Json(LoanResponse::from(loan)))
}

/// GET /loans - 全貸出を保存順に取得
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LoanListResponse>, ApiError> {
    let loans = execute_list_loans(&state.service_deps).await?;

    Ok(Json(LoanListResponse::from(loans)))
}

/// GET /health - ストアに疎通できれば200
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.service_deps.loan_store.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
