use crate::domain::{IdentifierError, commands::RawId};

use super::errors::{LoanApplicationError, Result};

/// 未検証の識別子を型付きIDに変換する
///
/// 欠落・非整数・0以下はすべて`InvalidArgument`になる。
/// ストアやカタログへのアクセス前に呼ぶこと。
pub fn parse_identifier<T>(field: &'static str, raw: Option<&RawId>) -> Result<T>
where
    T: TryFrom<i64, Error = IdentifierError>,
{
    raw.ok_or(IdentifierError::Missing)
        .and_then(RawId::to_i64)
        .and_then(T::try_from)
        .map_err(|reason| LoanApplicationError::InvalidArgument { field, reason })
}
