use crate::domain::value_objects::BookId;
use crate::ports::book_service::{BookService as BookServiceTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// BookServiceのモック実装
///
/// 書籍IDを保存することで状態を持ったテストをサポート。
/// 登録された書籍だけが「存在する」と判定される。
pub struct BookService {
    books: Mutex<HashSet<BookId>>,
}

impl BookService {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashSet::new()),
        }
    }

    /// 書籍IDをまとめて登録した状態で作成
    pub fn with_books(book_ids: impl IntoIterator<Item = BookId>) -> Self {
        Self {
            books: Mutex::new(book_ids.into_iter().collect()),
        }
    }

    /// テスト用に書籍を登録
    pub fn add_book(&self, book_id: BookId) {
        self.books
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(book_id);
    }

    /// 書籍を削除（カタログからの除籍を再現する）
    pub fn remove_book(&self, book_id: BookId) {
        self.books
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&book_id);
    }
}

impl Default for BookService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookServiceTrait for BookService {
    /// 登録された書籍の中に存在するかチェック
    async fn exists(&self, book_id: BookId) -> Result<bool> {
        let books = self
            .books
            .lock()
            .map_err(|_| "mock book service lock poisoned")?;
        Ok(books.contains(&book_id))
    }
}
