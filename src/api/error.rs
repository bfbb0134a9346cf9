use crate::application::loan::LoanApplicationError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// リクエストボディがJSONとして解釈できない場合も、入力不正として同じ形式で返す。
#[derive(Debug)]
pub enum ApiError {
    Application(LoanApplicationError),
    InvalidBody(JsonRejection),
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

fn status_and_code(err: &LoanApplicationError) -> (StatusCode, &'static str) {
    match err {
        // 400 Bad Request - 入力の欠落・不正
        LoanApplicationError::InvalidArgument { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
        }

        // 404 Not Found - 参照先が存在しない
        LoanApplicationError::BookNotFound(_) => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND"),
        LoanApplicationError::MemberNotFound(_) => (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND"),
        LoanApplicationError::LoanNotFound(_) => (StatusCode::NOT_FOUND, "LOAN_NOT_FOUND"),

        // 409 Conflict - 不変条件違反
        LoanApplicationError::ActiveLoanExists { .. } => {
            (StatusCode::CONFLICT, "ACTIVE_LOAN_EXISTS")
        }
        LoanApplicationError::AlreadyReturned(_) => (StatusCode::CONFLICT, "ALREADY_RETURNED"),

        // 500 Internal Server Error - システム障害
        LoanApplicationError::LoanStoreError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "LOAN_STORE_ERROR")
        }
        LoanApplicationError::MemberServiceError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "MEMBER_SERVICE_ERROR")
        }
        LoanApplicationError::BookServiceError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "BOOK_SERVICE_ERROR")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Application(err) => err,
            // 400 Bad Request - ボディの構文・Content-Typeの不正
            ApiError::InvalidBody(rejection) => {
                let body = Json(ErrorResponse::new(
                    "INVALID_ARGUMENT",
                    rejection.body_text(),
                ));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        };

        let (status, error_type) = status_and_code(&err);

        // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        let message = if status.is_server_error() {
            match std::error::Error::source(&err) {
                Some(source) => tracing::error!("{}: {}", err, source),
                None => tracing::error!("{}", err),
            }
            "An unexpected error occurred".to_string()
        } else {
            err.to_string()
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
