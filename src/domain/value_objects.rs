use serde::{Deserialize, Serialize};
use std::fmt;

use super::IdentifierError;

/// 識別子は正の整数のみ有効（PostgreSQLのBIGSERIALと同じ値域）
fn ensure_positive(value: i64) -> Result<i64, IdentifierError> {
    if value <= 0 {
        return Err(IdentifierError::NotPositive(value));
    }
    Ok(value)
}

/// 貸出ID - ストアが採番する集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(i64);

impl LoanId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for LoanId {
    type Error = IdentifierError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ensure_positive(value).map(Self)
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 書籍ID - カタログ管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for BookId {
    type Error = IdentifierError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ensure_positive(value).map(Self)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会員ID - 会員管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for MemberId {
    type Error = IdentifierError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ensure_positive(value).map(Self)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
