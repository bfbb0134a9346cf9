use serde::{Deserialize, Serialize};

use super::IdentifierError;

/// 外部から受け取った未検証の識別子
///
/// JSONの数値と数値文字列（例: `"12"`）の両方を受け付ける。
/// それ以外の型（真偽値・配列など）も`Other`として受け取り、
/// 型付きIDへの変換時（アプリケーション層のバリデーション）に拒否する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl RawId {
    pub fn number(value: i64) -> Self {
        RawId::Number(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        RawId::Text(value.into())
    }

    /// 整数値として解釈する（正負のチェックは型付きIDのTryFromで行う）
    pub fn to_i64(&self) -> Result<i64, IdentifierError> {
        match self {
            RawId::Number(n) => n
                .as_i64()
                .ok_or_else(|| IdentifierError::NotAnInteger(n.to_string())),
            RawId::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdentifierError::Empty);
                }
                trimmed
                    .parse::<i64>()
                    .map_err(|_| IdentifierError::NotAnInteger(trimmed.to_string()))
            }
            RawId::Other(value) => Err(IdentifierError::NotAnInteger(value.to_string())),
        }
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        RawId::Number(value.into())
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        RawId::Text(value.to_string())
    }
}

impl From<String> for RawId {
    fn from(value: String) -> Self {
        RawId::Text(value)
    }
}

/// コマンド：書籍を貸し出す
///
/// 両フィールドとも未検証。欠落は`None`で表す。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateLoan {
    pub book_id: Option<RawId>,
    pub member_id: Option<RawId>,
}

impl CreateLoan {
    pub fn new(book_id: i64, member_id: i64) -> Self {
        Self::from_raw(RawId::number(book_id), RawId::number(member_id))
    }

    pub fn from_raw(book_id: RawId, member_id: RawId) -> Self {
        Self {
            book_id: Some(book_id),
            member_id: Some(member_id),
        }
    }
}
