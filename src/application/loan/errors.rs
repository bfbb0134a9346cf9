use crate::domain::{BookId, IdentifierError, LoanId, MemberId};
use thiserror::Error;

/// エラーの分類
///
/// 境界層（HTTPなど）がレスポンスを決めるための粗い区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力の欠落・不正。呼び出し側が入力を直せば回復可能
    InvalidArgument,
    /// 参照先（書籍・会員・貸出）が存在しない
    NotFound,
    /// 不変条件に違反する操作。同じリクエストの再試行は無意味
    Conflict,
    /// ストアやカタログに到達できない
    Unavailable,
}

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 識別子の欠落・形式不正（ストアへのアクセス前に検出）
    #[error("{field} {reason}")]
    InvalidArgument {
        field: &'static str,
        #[source]
        reason: IdentifierError,
    },

    /// 書籍が存在しない
    #[error("Book with id {0} not found")]
    BookNotFound(BookId),

    /// 会員が存在しない
    #[error("Member with id {0} not found")]
    MemberNotFound(MemberId),

    /// 貸出が見つからない
    #[error("Loan with id {0} not found")]
    LoanNotFound(LoanId),

    /// 会員が同じ書籍を既に借りている
    #[error("Member {member_id} already has an active loan for book {book_id}")]
    ActiveLoanExists { book_id: BookId, member_id: MemberId },

    /// 既に返却済み
    #[error("Loan with id {0} has already been returned")]
    AlreadyReturned(LoanId),

    /// LoanStoreのエラー
    #[error("Loan store error")]
    LoanStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// MemberServiceのエラー
    #[error("Member service error")]
    MemberServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// BookServiceのエラー
    #[error("Book service error")]
    BookServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoanApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoanApplicationError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LoanApplicationError::BookNotFound(_)
            | LoanApplicationError::MemberNotFound(_)
            | LoanApplicationError::LoanNotFound(_) => ErrorKind::NotFound,
            LoanApplicationError::ActiveLoanExists { .. }
            | LoanApplicationError::AlreadyReturned(_) => ErrorKind::Conflict,
            LoanApplicationError::LoanStoreError(_)
            | LoanApplicationError::MemberServiceError(_)
            | LoanApplicationError::BookServiceError(_) => ErrorKind::Unavailable,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
