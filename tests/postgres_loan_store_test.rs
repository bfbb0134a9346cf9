use chrono::{Duration, Utc};
use rusty_library_lending::adapters::postgres::{PostgresCatalog, PostgresLoanStore};
use rusty_library_lending::domain::value_objects::{BookId, LoanId, MemberId};
use rusty_library_lending::ports::{
    BookService, InsertOutcome, LoanStore, MemberService, ReturnOutcome,
};
use serial_test::serial;
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Barrier;

mod common;

// ============================================================================
// テストデータ
// ============================================================================

static SEQ: AtomicU64 = AtomicU64::new(0);

/// 書籍を1件登録してIDを返す
async fn insert_book(pool: &PgPool) -> BookId {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO books (title, author) VALUES ('Test Book', 'Test Author') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    BookId::new(id)
}

/// 会員を1件登録してIDを返す（emailはテスト実行ごとに一意）
async fn insert_member(pool: &PgPool) -> MemberId {
    let email = format!(
        "member-{}-{}@example.com",
        Utc::now().timestamp_micros(),
        SEQ.fetch_add(1, Ordering::SeqCst)
    );
    let id: i64 =
        sqlx::query_scalar("INSERT INTO members (name, email) VALUES ('Tester', $1) RETURNING id")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap();
    MemberId::new(id)
}

async fn setup() -> (PgPool, PostgresLoanStore, BookId, MemberId) {
    let pool = common::create_test_pool().await;
    let store = PostgresLoanStore::new(pool.clone());
    let book_id = insert_book(&pool).await;
    let member_id = insert_member(&pool).await;
    (pool, store, book_id, member_id)
}

// ============================================================================
// 条件付き挿入
// ============================================================================

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_insert_then_conflict_on_same_pair() {
    let (_pool, store, book_id, member_id) = setup().await;
    let now = Utc::now();

    let first = store
        .insert_active_if_absent(book_id, member_id, now)
        .await
        .unwrap();
    let InsertOutcome::Inserted(loan) = first else {
        panic!("expected insert, got {:?}", first);
    };
    assert_eq!(loan.book_id, book_id);
    assert_eq!(loan.member_id, member_id);
    assert!(loan.is_active());

    let second = store
        .insert_active_if_absent(book_id, member_id, now)
        .await
        .unwrap();
    assert_eq!(second, InsertOutcome::ActiveLoanExists);

    let active = store.find_active_loan(book_id, member_id).await.unwrap();
    assert_eq!(active, Some(loan));
}

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_create_exactly_one_active_loan() {
    let (pool, store, book_id, member_id) = setup().await;
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                store
                    .insert_active_if_absent(book_id, member_id, Utc::now())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if let InsertOutcome::Inserted(_) = handle.await.unwrap() {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND member_id = $2 AND returned_at IS NULL",
    )
    .bind(book_id.value())
    .bind(member_id.value())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

// ============================================================================
// 条件付き返却
// ============================================================================

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_mark_returned_only_once() {
    let (_pool, store, book_id, member_id) = setup().await;
    let loaned_at = Utc::now();
    let InsertOutcome::Inserted(loan) = store
        .insert_active_if_absent(book_id, member_id, loaned_at)
        .await
        .unwrap()
    else {
        panic!("expected insert");
    };

    let first = store
        .mark_returned_if_active(loan.loan_id, loaned_at + Duration::minutes(5))
        .await
        .unwrap();
    let ReturnOutcome::Returned(returned) = first else {
        panic!("expected return, got {:?}", first);
    };
    assert!(returned.returned_at.is_some());

    let second = store
        .mark_returned_if_active(loan.loan_id, loaned_at + Duration::minutes(10))
        .await
        .unwrap();
    assert_eq!(second, ReturnOutcome::AlreadyReturned(returned.clone()));

    // 返却後は同じ組み合わせで再度貸出できる
    let again = store
        .insert_active_if_absent(book_id, member_id, Utc::now())
        .await
        .unwrap();
    assert!(matches!(again, InsertOutcome::Inserted(_)));
}

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_returned_at_never_precedes_loaned_at() {
    let (_pool, store, book_id, member_id) = setup().await;
    let loaned_at = Utc::now();
    let InsertOutcome::Inserted(loan) = store
        .insert_active_if_absent(book_id, member_id, loaned_at)
        .await
        .unwrap()
    else {
        panic!("expected insert");
    };

    let outcome = store
        .mark_returned_if_active(loan.loan_id, loaned_at - Duration::hours(1))
        .await
        .unwrap();

    let ReturnOutcome::Returned(returned) = outcome else {
        panic!("expected return, got {:?}", outcome);
    };
    assert_eq!(returned.returned_at, Some(returned.loaned_at));
}

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_mark_returned_unknown_loan() {
    let (_pool, store, _, _) = setup().await;

    let outcome = store
        .mark_returned_if_active(LoanId::new(i64::MAX), Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome, ReturnOutcome::NotFound);
    assert_eq!(store.find_by_id(LoanId::new(i64::MAX)).await.unwrap(), None);
}

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_returns_succeed_exactly_once() {
    let (_pool, store, book_id, member_id) = setup().await;
    let InsertOutcome::Inserted(loan) = store
        .insert_active_if_absent(book_id, member_id, Utc::now())
        .await
        .unwrap()
    else {
        panic!("expected insert");
    };
    let loan_id = loan.loan_id;
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                store
                    .mark_returned_if_active(loan_id, Utc::now())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut returned = Vec::new();
    let mut already_returned = 0;
    for handle in handles {
        match handle.await.unwrap() {
            ReturnOutcome::Returned(loan) => returned.push(loan),
            ReturnOutcome::AlreadyReturned(_) => already_returned += 1,
            ReturnOutcome::NotFound => panic!("loan disappeared"),
        }
    }
    assert_eq!(returned.len(), 1);
    assert_eq!(already_returned, 15);

    // 最初の返却時刻が保存されたまま
    let stored = store.find_by_id(loan_id).await.unwrap().unwrap();
    assert_eq!(stored.returned_at, returned[0].returned_at);
}

// ============================================================================
// 参照整合性
// ============================================================================

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_insert_for_missing_catalog_entries_is_not_found() {
    let (_pool, store, book_id, member_id) = setup().await;

    let outcome = store
        .insert_active_if_absent(BookId::new(i64::MAX), member_id, Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::BookNotFound);

    let outcome = store
        .insert_active_if_absent(book_id, MemberId::new(i64::MAX), Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::MemberNotFound);

    assert_eq!(store.find_active_loan(book_id, member_id).await.unwrap(), None);
}

// ============================================================================
// 一覧・カタログ・疎通確認
// ============================================================================

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_list_all_is_ordered_by_loan_id() {
    let (pool, store, book_id, member_id) = setup().await;
    let other_book = insert_book(&pool).await;

    store
        .insert_active_if_absent(book_id, member_id, Utc::now())
        .await
        .unwrap();
    store
        .insert_active_if_absent(other_book, member_id, Utc::now())
        .await
        .unwrap();

    let loans = store.list_all().await.unwrap();
    let ids: Vec<i64> = loans.iter().map(|l| l.loan_id.value()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert!(loans.iter().any(|l| l.is_for(other_book, member_id)));
}

#[serial]
#[test_with::env(DATABASE_URL)]
#[tokio::test]
async fn test_catalog_existence_checks() {
    let (pool, store, book_id, member_id) = setup().await;
    let catalog = PostgresCatalog::new(pool);

    assert!(BookService::exists(&catalog, book_id).await.unwrap());
    assert!(MemberService::exists(&catalog, member_id).await.unwrap());
    assert!(!BookService::exists(&catalog, BookId::new(i64::MAX)).await.unwrap());
    assert!(!MemberService::exists(&catalog, MemberId::new(i64::MAX)).await.unwrap());

    store.ping().await.unwrap();
}
