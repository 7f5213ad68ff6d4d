//! 小さなブログCMSのコアロジック
//!
//! スラッグの生成と一意性保証、タグ正規化、著者入力Markdownの安全な
//! HTML変換、そして一覧・検索が共有するページネーション契約を提供します。
//!
//! ストア（PostgreSQL）はリポジトリトレイトで抽象化され、
//! ハンドラー・サービスには依存注入で渡します。HTTPルーティング・
//! テンプレート描画・セッション管理は外部の協調コンポーネントであり、
//! このクレートはビュー層にプレーンなデータ構造を渡すだけです。

pub mod app;
pub mod domain;
pub mod infra;
pub mod types;
