//! インフラ層モジュール
//!
//! 環境変数からの設定読み込みとデータベース接続の確立を担当します。

pub mod config;
pub mod db;

pub use config::AppConfig;
pub use db::{create_pool, initialize_database, setup_database};
