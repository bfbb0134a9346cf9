use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 条件付き挿入の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 新しいActiveな貸出が作成された
    Inserted(Loan),
    /// 同じ(書籍, 会員)の組に既にActiveな貸出が存在する
    ActiveLoanExists,
    /// 存在確認の後、挿入までの間に書籍がカタログから消えた
    BookNotFound,
    /// 存在確認の後、挿入までの間に会員がカタログから消えた
    MemberNotFound,
}

/// 条件付き返却の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// 今回の呼び出しで返却された
    Returned(Loan),
    /// 既に返却済み（記録は変更されていない）
    AlreadyReturned(Loan),
    /// 貸出が存在しない
    NotFound,
}

/// 貸出ストアポート
///
/// 貸出レコードの唯一の所有者。
/// 不変条件「(書籍, 会員)ごとにActiveな貸出は高々1件」と
/// 「返却は一度だけ」は、このポートの条件付き操作の原子性で保証する。
/// 呼び出し側で「存在確認してから挿入」してはならない。
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// (書籍, 会員)の組のActiveな貸出を取得する
    async fn find_active_loan(&self, book_id: BookId, member_id: MemberId)
    -> Result<Option<Loan>>;

    /// Activeな貸出が存在しない場合に限り、新しい貸出を挿入する
    ///
    /// 存在確認と書き込みは、同じ組に対する他の挿入と不可分に行われる。
    /// 競合は`InsertOutcome::ActiveLoanExists`として返し、エラーにはしない。
    /// 参照整合性を持つストアは、参照先が消えていた場合に
    /// `BookNotFound` / `MemberNotFound`を返す。
    async fn insert_active_if_absent(
        &self,
        book_id: BookId,
        member_id: MemberId,
        loaned_at: DateTime<Utc>,
    ) -> Result<InsertOutcome>;

    /// IDで貸出を取得する
    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 全貸出を保存順に取得する
    async fn list_all(&self) -> Result<Vec<Loan>>;

    /// 貸出がActiveな場合に限り返却時刻を設定する
    ///
    /// 「returned_atがNULLであること」を条件とした原子的な更新。
    /// 同時に呼ばれても成功するのは1件だけ。
    async fn mark_returned_if_active(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnOutcome>;

    /// ストアへの疎通確認（ヘルスチェック用）
    async fn ping(&self) -> Result<()>;
}
