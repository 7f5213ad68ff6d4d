//! 記事ドメインモジュール
//!
//! スラッグ生成・一意性解決・タグ正規化・安全なMarkdown描画と、
//! 一覧/検索のページネーション契約を提供します。

pub mod model;
pub mod render;
pub mod repository;
pub mod service;
pub mod slug;
pub mod tags;

// 公開APIの再エクスポート

// model.rsから
pub use model::{Article, ArticleDraft, ArticleFilter, Page, PageRequest};

// render.rsから
pub use render::{highlight, render_markdown_safe};

// repository.rsから
pub use repository::{ArticleRepository, InMemoryArticleRepository, PgArticleRepository};

// service.rsから
pub use service::ArticleService;

// slug.rs / tags.rsから
pub use slug::slugify;
pub use tags::normalize_tags;
