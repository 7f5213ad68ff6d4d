use crate::types::{AppError, AppResult};
use std::env;

/// 1ページあたりの記事数のデフォルト値
const DEFAULT_ARTICLES_PER_PAGE: i64 = 10;

/// アプリケーション設定
/// 環境変数（.envファイルがあれば併用）から読み込む
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL接続文字列
    pub database_url: String,
    /// 一覧ページの1ページあたり件数
    pub articles_per_page: i64,
    /// 初期管理者アカウントのメールアドレス（未設定ならシードしない）
    pub admin_email: Option<String>,
    /// 初期管理者アカウントのパスワード
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> AppResult<Self> {
        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::config(
                "DATABASE_URL環境変数が設定されていません。.envファイルを確認してください。",
            )
        })?;

        let articles_per_page = match env::var("ARTICLES_PER_PAGE") {
            Ok(raw) => raw.parse::<i64>().map_err(|_| {
                AppError::config(format!("ARTICLES_PER_PAGEが数値ではありません: {}", raw))
            })?,
            Err(_) => DEFAULT_ARTICLES_PER_PAGE,
        };
        if articles_per_page < 1 {
            return Err(AppError::config(format!(
                "ARTICLES_PER_PAGEは1以上である必要があります: {}",
                articles_per_page
            )));
        }

        Ok(Self {
            database_url,
            articles_per_page,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}
