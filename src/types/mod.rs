//! 型定義モジュール
//!
//! アプリケーション全体で使用される共通的な型定義を管理します。
//! - エラー型: ドメイン横断で使用される統一エラー表現

pub mod error;

// 便利な再エクスポート
pub use error::{AppError, AppResult};
