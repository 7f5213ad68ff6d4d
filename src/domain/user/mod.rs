//! ユーザードメインモジュール
//!
//! 登録・認証と管理者ガードを提供します。パスワードはソルト付き
//! ハッシュのみを保存し、平文は一切保持しません。

pub mod model;
pub mod repository;
pub mod service;

// 公開APIの再エクスポート

// model.rsから
pub use model::{hash_password, User};

// repository.rsから
pub use repository::{InMemoryUserRepository, PgUserRepository, UserRepository};

// service.rsから
pub use service::{require_admin, AuthService};
