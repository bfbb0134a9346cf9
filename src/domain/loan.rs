use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, MemberId, ReturnLoanError};

// ============================================================================
// 貸出ステータス
// ============================================================================

/// 貸出ステータス
///
/// `returned_at`から導出される。永続化はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 返却済み（終端状態）
    Returned,
}

// ============================================================================
// Loan集約
// ============================================================================

/// Loan集約 - 1冊の書籍の1回の貸出
///
/// 不変条件：
/// - loan_id, book_id, member_id, loaned_at は作成後に変わらない
/// - returned_at は一度だけ設定され、loaned_at より前にはならない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loaned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        match self.returned_at {
            None => LoanStatus::Active,
            Some(_) => LoanStatus::Returned,
        }
    }

    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// 同じ(書籍, 会員)の組に対する貸出か
    pub fn is_for(&self, book_id: BookId, member_id: MemberId) -> bool {
        self.book_id == book_id && self.member_id == member_id
    }
}

/// 純粋関数：貸出を開始する
///
/// IDはストアが採番するため引数で受け取る。状態はActive。
pub fn open_loan(
    loan_id: LoanId,
    book_id: BookId,
    member_id: MemberId,
    loaned_at: DateTime<Utc>,
) -> Loan {
    Loan {
        loan_id,
        book_id,
        member_id,
        loaned_at,
        returned_at: None,
    }
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みの貸出は再返却できない（冪等ではない）
/// - 返却時刻は貸出時刻より前にならない（時計のずれは貸出時刻に丸める）
///
/// 副作用なし。返却済みのLoanを返す。
pub fn return_loan(loan: &Loan, returned_at: DateTime<Utc>) -> Result<Loan, ReturnLoanError> {
    if loan.returned_at.is_some() {
        return Err(ReturnLoanError::AlreadyReturned);
    }

    Ok(Loan {
        returned_at: Some(returned_at.max(loan.loaned_at)),
        ..loan.clone()
    })
}
