//! アプリケーション層モジュール
//!
//! ルーティング層から呼ばれるハンドラー群。サービスを依存注入で受け取り、
//! ビュー層に渡すプレーンなデータ構造（ビューモデル）または
//! リダイレクト先を返します。HTTPやテンプレートには一切触れません。

pub mod admin;
pub mod auth;
pub mod forms;
pub mod site;

/// 記事一覧ページのパス
pub const ARTICLES_PATH: &str = "/articles";

/// 記事詳細ページのパス
pub fn article_path(slug: &str) -> String {
    format!("/a/{}", slug)
}

/// ハンドラーの処理結果
/// ビュー層に渡すデータか、リダイレクト先パスのどちらかになる
#[derive(Debug)]
pub enum Outcome<T> {
    /// ビュー層に渡すデータ
    View(T),
    /// リダイレクト先のパス
    Redirect(String),
}

impl<T> Outcome<T> {
    /// リダイレクトの場合、その宛先パスを返す
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            Self::Redirect(path) => Some(path),
            Self::View(_) => None,
        }
    }

    /// ビューの場合、そのデータを取り出す
    pub fn into_view(self) -> Option<T> {
        match self {
            Self::View(data) => Some(data),
            Self::Redirect(_) => None,
        }
    }
}
