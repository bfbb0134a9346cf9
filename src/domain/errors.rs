use thiserror::Error;

/// 識別子のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// 値が指定されていない
    #[error("is required")]
    Missing,
    /// 空文字列
    #[error("must not be empty")]
    Empty,
    /// 整数として解釈できない
    #[error("must be an integer, got `{0}`")]
    NotAnInteger(String),
    /// 0以下
    #[error("must be a positive integer, got {0}")]
    NotPositive(i64),
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLoanError {
    /// 既に返却済み
    AlreadyReturned,
}
