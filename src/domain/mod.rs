//! ドメイン層モジュール
//!
//! 記事とユーザーのビジネスロジックを `model` / `repository` / `service` の
//! 3層で管理します。リポジトリはトレイトで抽象化され、PostgreSQL実装と
//! インメモリ実装を差し替えられます。

pub mod article;
pub mod user;
