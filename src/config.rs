//! 環境変数からの設定読み込み

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// 貸出ストアの実装選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    /// プロセス内メモリ。再起動で消える。開発・デモ用
    Memory,
}

/// アプリケーション設定
///
/// 各フィールドは同名の環境変数（大文字）に対応する。
/// 例: `PORT`, `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `STORE`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    #[serde(rename = "database_max_connections")]
    pub max_connections: u32,
    pub store: StoreKind,
    /// インメモリ構成でカタログに登録する書籍・会員の件数（ID 1..=n）
    pub memory_catalog_size: i64,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 未設定の項目はデフォルト値を使う。値が解釈できない場合はエラー。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default().try_parsing(true))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("database_url", "postgres://localhost/library")?
            .set_default("database_max_connections", 5)?
            .set_default("store", "postgres")?
            .set_default("memory_catalog_size", 10)?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
