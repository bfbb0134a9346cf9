use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use crate::ports::loan_store::{InsertOutcome, LoanStore as LoanStoreTrait, Result, ReturnOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

const MEMBER_FOREIGN_KEY: &str = "loans_member_id_fkey";

/// PostgreSQLの行データをLoanに変換する
fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        loan_id: LoanId::new(row.get("loan_id")),
        book_id: BookId::new(row.get("book_id")),
        member_id: MemberId::new(row.get("member_id")),
        loaned_at: row.get("loaned_at"),
        returned_at: row.get("returned_at"),
    }
}

/// LoanStoreのPostgreSQL実装
///
/// 不変条件はデータベース側で保証する：
/// - `loans_one_active_per_pair`（returned_at IS NULL の部分ユニークインデックス）
///   により、同じ組のActiveな貸出は2件以上存在できない
/// - 返却は `returned_at IS NULL` を条件にしたUPDATE 1文で行う
pub struct LoanStore {
    pool: PgPool,
}

impl LoanStore {
    /// PostgreSQLコネクションプールから新しいLoanStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStoreTrait for LoanStore {
    async fn find_active_loan(
        &self,
        book_id: BookId,
        member_id: MemberId,
    ) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loaned_at, returned_at
            FROM loans
            WHERE book_id = $1 AND member_id = $2 AND returned_at IS NULL
            "#,
        )
        .bind(book_id.value())
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    /// 条件付き挿入
    ///
    /// ON CONFLICT ... DO NOTHING により、部分ユニークインデックスに
    /// 衝突した場合は行が返らない。これを`ActiveLoanExists`として扱う。
    ///
    /// 存在確認の後に書籍・会員が削除されていた場合は外部キー違反になる。
    /// 違反した制約名から`BookNotFound` / `MemberNotFound`を判別する。
    async fn insert_active_if_absent(
        &self,
        book_id: BookId,
        member_id: MemberId,
        loaned_at: DateTime<Utc>,
    ) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO loans (book_id, member_id, loaned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (book_id, member_id) WHERE returned_at IS NULL
            DO NOTHING
            RETURNING loan_id, book_id, member_id, loaned_at, returned_at
            "#,
        )
        .bind(book_id.value())
        .bind(member_id.value())
        .bind(loaned_at)
        .fetch_optional(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Ok(match db_err.constraint() {
                    Some(MEMBER_FOREIGN_KEY) => InsertOutcome::MemberNotFound,
                    _ => InsertOutcome::BookNotFound,
                });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(match row {
            Some(row) => InsertOutcome::Inserted(map_row_to_loan(&row)),
            None => InsertOutcome::ActiveLoanExists,
        })
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loaned_at, returned_at
            FROM loans
            WHERE loan_id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    /// 全貸出を採番順（= 挿入順）に取得
    async fn list_all(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loaned_at, returned_at
            FROM loans
            ORDER BY loan_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }

    /// 条件付き返却
    ///
    /// 更新対象が0行の場合のみ、返却済みか存在しないかを判別するために再取得する。
    /// 返却済みの行は二度と更新されないため、この再取得に競合はない。
    async fn mark_returned_if_active(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<ReturnOutcome> {
        let row = sqlx::query(
            r#"
            UPDATE loans
            SET returned_at = GREATEST($2, loaned_at)
            WHERE loan_id = $1 AND returned_at IS NULL
            RETURNING loan_id, book_id, member_id, loaned_at, returned_at
            "#,
        )
        .bind(loan_id.value())
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(ReturnOutcome::Returned(map_row_to_loan(&row)));
        }

        Ok(match self.find_by_id(loan_id).await? {
            Some(loan) => ReturnOutcome::AlreadyReturned(loan),
            None => ReturnOutcome::NotFound,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
