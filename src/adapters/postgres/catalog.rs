use crate::domain::value_objects::{BookId, MemberId};
use crate::ports::{book_service, member_service};
use async_trait::async_trait;
use sqlx::PgPool;

/// カタログ（書籍・会員テーブル）のPostgreSQL実装
///
/// 貸出コンテキストからは読み取り専用。存在確認のみ提供する。
#[derive(Clone)]
pub struct Catalog {
    pool: PgPool,
}

impl Catalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl book_service::BookService for Catalog {
    async fn exists(&self, book_id: BookId) -> book_service::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id.value())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl member_service::MemberService for Catalog {
    async fn exists(&self, member_id: MemberId) -> member_service::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
                .bind(member_id.value())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
