use crate::domain::ReturnLoanError;
use crate::domain::loan::{self, Loan};
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use crate::ports::loan_store::{InsertOutcome, LoanStore as LoanStoreTrait, Result, ReturnOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    loans: Vec<Loan>,
    last_id: i64,
}

/// LoanStoreのインメモリ実装
///
/// 1つのMutexでレコードと採番を保護する。
/// 条件付き挿入・条件付き返却は、存在確認と書き込みを同じロック区間で行う。
/// ロックはawaitをまたいで保持しない。
pub struct LoanStore {
    state: Mutex<State>,
}

impl LoanStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| "in-memory loan store lock poisoned".into())
    }
}

impl Default for LoanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    async fn find_active_loan(
        &self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<Option<Loan>> {
        let state = self.lock()?;
        Ok(state
            .loans
            .iter()
            .find(|l| l.is_active() && l.is_for(book_id, member_id))
            .cloned())
    }

    async fn insert_active_if_absent(
        &self,
        book_id: BookId,
        member_id: MemberId,
        loaned_at: DateTime<Utc>,
    ) -> Result<InsertOutcome> {
        let mut state = self.lock()?;

        if state
            .loans
            .iter()
            .any(|l| l.is_active() && l.is_for(book_id, member_id))
        {
            return Ok(InsertOutcome::ActiveLoanExists);
        }

        state.last_id += 1;
        let loan = loan::open_loan(LoanId::new(state.last_id), book_id, member_id, loaned_at);
        state.loans.push(loan.clone());

        Ok(InsertOutcome::Inserted(loan))
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let state = self.lock()?;
        Ok(state.loans.iter().find(|l| l.loan_id == loan_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Loan>> {
        let state = self.lock()?;
        Ok(state.loans.clone())
    }

    async fn mark_returned_if_active(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnOutcome> {
        let mut state = self.lock()?;

        let Some(slot) = state.loans.iter_mut().find(|l| l.loan_id == loan_id) else {
            return Ok(ReturnOutcome::NotFound);
        };

        match loan::return_loan(slot, returned_at) {
            Ok(returned) => {
                *slot = returned.clone();
                Ok(ReturnOutcome::Returned(returned))
            }
            Err(ReturnLoanError::AlreadyReturned) => {
                Ok(ReturnOutcome::AlreadyReturned(slot.clone()))
            }
        }
    }

    async fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = LoanStore::new();
        let now = Utc::now();

        let first = store
            .insert_active_if_absent(BookId::new(1), MemberId::new(1), now)
            .await
            .unwrap();
        let second = store
            .insert_active_if_absent(BookId::new(2), MemberId::new(1), now)
            .await
            .unwrap();

        match (first, second) {
            (InsertOutcome::Inserted(a), InsertOutcome::Inserted(b)) => {
                assert_eq!(a.loan_id, LoanId::new(1));
                assert_eq!(b.loan_id, LoanId::new(2));
            }
            other => panic!("unexpected outcomes: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_second_active_loan_for_pair() {
        let store = LoanStore::new();
        let now = Utc::now();

        store
            .insert_active_if_absent(BookId::new(1), MemberId::new(1), now)
            .await
            .unwrap();
        let outcome = store
            .insert_active_if_absent(BookId::new(1), MemberId::new(1), now)
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::ActiveLoanExists);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_returned_only_once() {
        let store = LoanStore::new();
        let now = Utc::now();
        let InsertOutcome::Inserted(loan) = store
            .insert_active_if_absent(BookId::new(1), MemberId::new(1), now)
            .await
            .unwrap()
        else {
            panic!("expected insert");
        };

        let first = store
            .mark_returned_if_active(loan.loan_id, now + Duration::days(1))
            .await
            .unwrap();
        let second = store
            .mark_returned_if_active(loan.loan_id, now + Duration::days(2))
            .await
            .unwrap();

        let ReturnOutcome::Returned(returned) = first else {
            panic!("expected first return to succeed");
        };
        assert_eq!(returned.returned_at, Some(now + Duration::days(1)));
        assert_eq!(second, ReturnOutcome::AlreadyReturned(returned));
    }

    #[tokio::test]
    async fn test_mark_returned_unknown_loan() {
        let store = LoanStore::new();
        let outcome = store
            .mark_returned_if_active(LoanId::new(99), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, ReturnOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_find_active_loan_ignores_returned() {
        let store = LoanStore::new();
        let now = Utc::now();
        let InsertOutcome::Inserted(loan) = store
            .insert_active_if_absent(BookId::new(5), MemberId::new(6), now)
            .await
            .unwrap()
        else {
            panic!("expected insert");
        };

        assert!(
            store
                .find_active_loan(BookId::new(5), MemberId::new(6))
                .await
                .unwrap()
                .is_some()
        );

        store.mark_returned_if_active(loan.loan_id, now).await.unwrap();

        assert!(
            store
                .find_active_loan(BookId::new(5), MemberId::new(6))
                .await
                .unwrap()
                .is_none()
        );
    }
}
