pub mod catalog;
pub mod loan_store;

// パブリックに型を再エクスポート
pub use catalog::Catalog as PostgresCatalog;
pub use loan_store::LoanStore as PostgresLoanStore;

use sqlx::PgPool;

/// データベースへの疎通を確認し、結果をログに出す
///
/// 起動時に一度だけ呼ばれる。失敗しても起動は継続し、
/// 以降のリクエストはストアエラーとして扱われる。
pub async fn check_database_connection(pool: &PgPool) {
    match sqlx::query_scalar::<_, chrono::DateTime<chrono::Utc>>("SELECT NOW()")
        .fetch_one(pool)
        .await
    {
        Ok(now) => tracing::info!(%now, "Database connection success"),
        Err(e) => tracing::error!("Database connection error: {}", e),
    }
}
