use crate::domain::{
    BookId, LoanId, MemberId,
    commands::{CreateLoan, RawId},
    loan::Loan,
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{LoanApplicationError, Result};
use super::validation::parse_identifier;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
/// プロセス起動時に一度だけ構築し、各リクエストで共有する。
///
/// 貸出の状態はすべてloan_storeが保持する。
/// この構造体自体はリクエスト間で状態を持たない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub loan_store: Arc<dyn LoanStore>,
    pub member_service: Arc<dyn MemberService>,
    pub book_service: Arc<dyn BookService>,
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - book_id, member_id が正の整数であること（InvalidArgument）
/// - 書籍が存在すること（BookNotFound）
/// - 会員が存在すること（MemberNotFound）
/// - 同じ(書籍, 会員)の組にActiveな貸出がないこと（ActiveLoanExists）
///
/// # 一貫性保証
///
/// 最後のルールはストアの条件付き挿入で判定する。
/// 事前の存在確認は行わないため、同時に同じ組で呼ばれても
/// 成功するのは1件だけで、残りはすべて`ActiveLoanExists`になる。
///
/// # 冪等性
///
/// 冪等ではない。2回目の呼び出しは`ActiveLoanExists`で失敗する。
#[tracing::instrument(skip(deps), err(level = tracing::Level::DEBUG))]
pub async fn create_loan(deps: &ServiceDependencies, cmd: CreateLoan) -> Result<Loan> {
    // 1. 入力のバリデーション（ストアへのアクセス前）
    let book_id: BookId = parse_identifier("book_id", cmd.book_id.as_ref())?;
    let member_id: MemberId = parse_identifier("member_id", cmd.member_id.as_ref())?;

    // 2. 書籍の存在確認
    let book_exists = deps
        .book_service
        .exists(book_id)
        .await
        .map_err(LoanApplicationError::BookServiceError)?;

    if !book_exists {
        return Err(LoanApplicationError::BookNotFound(book_id));
    }

    // 3. 会員の存在確認
    let member_exists = deps
        .member_service
        .exists(member_id)
        .await
        .map_err(LoanApplicationError::MemberServiceError)?;

    if !member_exists {
        return Err(LoanApplicationError::MemberNotFound(member_id));
    }

    // 4. 条件付き挿入
    let outcome = deps
        .loan_store
        .insert_active_if_absent(book_id, member_id, chrono::Utc::now())
        .await
        .map_err(LoanApplicationError::LoanStoreError)?;

    match outcome {
        InsertOutcome::Inserted(loan) => {
            tracing::info!(loan_id = %loan.loan_id, "loan created");
            Ok(loan)
        }
        InsertOutcome::ActiveLoanExists => {
            tracing::warn!("active loan already exists");
            Err(LoanApplicationError::ActiveLoanExists { book_id, member_id })
        }
        InsertOutcome::BookNotFound => Err(LoanApplicationError::BookNotFound(book_id)),
        InsertOutcome::MemberNotFound => Err(LoanApplicationError::MemberNotFound(member_id)),
    }
}

/// IDで貸出を取得する
///
/// 副作用なし。
#[tracing::instrument(skip(deps), err(level = tracing::Level::DEBUG))]
pub async fn get_loan(deps: &ServiceDependencies, id: RawId) -> Result<Loan> {
    let loan_id: LoanId = parse_identifier("id", Some(&id))?;

    deps.loan_store
        .find_by_id(loan_id)
        .await
        .map_err(LoanApplicationError::LoanStoreError)?
        .ok_or(LoanApplicationError::LoanNotFound(loan_id))
}

/// 全貸出を保存順に取得する
///
/// 呼び出し時点のスナップショットを返す。ページングなし。
#[tracing::instrument(skip(deps), err(level = tracing::Level::DEBUG))]
pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_store
        .list_all()
        .await
        .map_err(LoanApplicationError::LoanStoreError)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること（LoanNotFound）
/// - 貸出がActiveであること（AlreadyReturned）
///
/// 返却は冪等ではない。返却済みの貸出に対する2回目の呼び出しはエラーで、
/// returned_at は最初の値のまま変わらない。
#[tracing::instrument(skip(deps), err(level = tracing::Level::DEBUG))]
pub async fn return_loan(deps: &ServiceDependencies, id: RawId) -> Result<Loan> {
    let loan_id: LoanId = parse_identifier("id", Some(&id))?;

    let outcome = deps
        .loan_store
        .mark_returned_if_active(loan_id, chrono::Utc::now())
        .await
        .map_err(LoanApplicationError::LoanStoreError)?;

    match outcome {
        ReturnOutcome::Returned(loan) => {
            tracing::info!(%loan_id, "loan returned");
            Ok(loan)
        }
        ReturnOutcome::AlreadyReturned(_) => {
            tracing::warn!(%loan_id, "loan already returned");
            Err(LoanApplicationError::AlreadyReturned(loan_id))
        }
        ReturnOutcome::NotFound => Err(LoanApplicationError::LoanNotFound(loan_id)),
    }
}
