use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    commands::{CreateLoan, RawId},
    loan::{Loan, LoanStatus},
};

/// 貸出作成リクエスト（POST /loans）
///
/// IDは数値でも数値文字列でもよい。検証はアプリケーション層で行う。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    pub book_id: Option<RawId>,
    pub member_id: Option<RawId>,
}

impl CreateLoanRequest {
    pub fn to_command(&self) -> CreateLoan {
        CreateLoan {
            book_id: self.book_id.clone(),
            member_id: self.member_id.clone(),
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.loan_id.value(),
            book_id: loan.book_id.value(),
            member_id: loan.member_id.value(),
            loaned_at: loan.loaned_at,
            returned_at: loan.returned_at,
            status: loan.status(),
        }
    }
}

/// 貸出一覧レスポンス（GET /loans）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanListResponse {
    pub length: usize,
    pub data: Vec<LoanResponse>,
}

impl From<Vec<Loan>> for LoanListResponse {
    fn from(loans: Vec<Loan>) -> Self {
        let data: Vec<LoanResponse> = loans.into_iter().map(LoanResponse::from).collect();
        Self {
            length: data.len(),
            data,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
