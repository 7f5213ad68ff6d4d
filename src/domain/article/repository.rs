use super::model::{Article, ArticleDraft, ArticleFilter, Page, PageRequest};
use crate::types::error::is_unique_violation;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Mutex;

/// 記事ストアの抽象化トレイト
///
/// このトレイトは、PostgreSQL実装とテスト用のインメモリ実装の両方を
/// 統一的に扱えるようにするためのインターフェースです。
/// スラッグの一意性制約はストア側が最終的に担保し、違反時には
/// `AppError::SlugConflict` を返します。
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// 記事を挿入し、ストアが採番した完全な記事を返す
    async fn insert(&self, draft: &ArticleDraft, tags: &str, slug: &str) -> AppResult<Article>;

    /// 記事を更新し、更新後の記事を返す
    async fn update(
        &self,
        id: i32,
        draft: &ArticleDraft,
        tags: &str,
        slug: &str,
    ) -> AppResult<Article>;

    /// 記事を削除する
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// IDで記事を取得する
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Article>>;

    /// スラッグで記事を取得する
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Article>>;

    /// スラッグが既に使用されているかを判定する
    /// 編集時は `excluding_id` で自分自身を除外する
    async fn slug_exists(&self, slug: &str, excluding_id: Option<i32>) -> AppResult<bool>;

    /// フィルター条件に一致する記事をID降順（新しい順）でページ取得する
    async fn search(&self, filter: &ArticleFilter, page: PageRequest) -> AppResult<Page<Article>>;

    /// 最新の記事をID降順で取得する
    async fn latest(&self, limit: i64) -> AppResult<Vec<Article>>;
}

const ARTICLE_COLUMNS: &str = "id, title, body, tags, slug, cover_image, created_at";

/// PostgreSQLを使用した本番用の記事リポジトリ実装
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    /// 接続プールからリポジトリを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// フィルター条件をWHERE句として動的に組み立てる
/// インメモリ実装の `ArticleFilter::matches` と同じ意味論を保つこと
fn push_filter(qb: &mut QueryBuilder<Postgres>, filter: &ArticleFilter) {
    match filter {
        ArticleFilter::All => {}
        ArticleFilter::Tag(tag) => {
            qb.push(" WHERE tags ILIKE ")
                .push_bind(format!("%{}%", tag));
        }
        ArticleFilter::Query(query) => {
            let pattern = format!("%{}%", query);
            qb.push(" WHERE (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR body ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn insert(&self, draft: &ArticleDraft, tags: &str, slug: &str) -> AppResult<Article> {
        let result = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (title, body, tags, slug, cover_image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, body, tags, slug, cover_image, created_at
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(tags)
        .bind(slug)
        .bind(&draft.cover_image)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::slug_conflict(slug)
            } else {
                AppError::database("記事の挿入", e)
            }
        })
    }

    async fn update(
        &self,
        id: i32,
        draft: &ArticleDraft,
        tags: &str,
        slug: &str,
    ) -> AppResult<Article> {
        let result = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = $2, body = $3, tags = $4, slug = $5, cover_image = $6
            WHERE id = $1
            RETURNING id, title, body, tags, slug, cover_image, created_at
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(tags)
        .bind(slug)
        .bind(&draft.cover_image)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(article)) => Ok(article),
            Ok(None) => Err(AppError::not_found("記事")),
            Err(e) if is_unique_violation(&e) => Err(AppError::slug_conflict(slug)),
            Err(e) => Err(AppError::database("記事の更新", e)),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("記事の削除", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("記事"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Article>> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {} FROM articles WHERE id = $1",
            ARTICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("記事のID検索", e))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Article>> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {} FROM articles WHERE slug = $1",
            ARTICLE_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("記事のスラッグ検索", e))
    }

    async fn slug_exists(&self, slug: &str, excluding_id: Option<i32>) -> AppResult<bool> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles WHERE slug = ");
        qb.push_bind(slug);
        if let Some(id) = excluding_id {
            qb.push(" AND id != ").push_bind(id);
        }

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database("スラッグ存在確認", e))?;

        Ok(count > 0)
    }

    async fn search(&self, filter: &ArticleFilter, page: PageRequest) -> AppResult<Page<Article>> {
        // 件数クエリとページ取得クエリで同一のWHERE句を共有する
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles");
        push_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database("記事件数の取得", e))?;

        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM articles", ARTICLE_COLUMNS));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(page.per_page)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = qb
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("記事一覧の取得", e))?;

        Ok(Page::new(items, total, page))
    }

    async fn latest(&self, limit: i64) -> AppResult<Vec<Article>> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {} FROM articles ORDER BY id DESC LIMIT $1",
            ARTICLE_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("最新記事の取得", e))
    }
}

/// テスト用のインメモリ記事リポジトリ
///
/// この実装はテスト時にDIされ、PostgreSQLへの接続を行わずに
/// 同じ契約（ID降順、スラッグ一意性制約、部分一致検索）を提供します。
#[derive(Default)]
pub struct InMemoryArticleRepository {
    inner: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    articles: Vec<Article>,
    next_id: i32,
}

impl InMemoryArticleRepository {
    /// 空のリポジトリを作成
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        // ポイズンされても状態を回収して続行する
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn insert(&self, draft: &ArticleDraft, tags: &str, slug: &str) -> AppResult<Article> {
        let mut state = self.lock();
        // ストアの一意性制約を模倣する
        if state.articles.iter().any(|a| a.slug == slug) {
            return Err(AppError::slug_conflict(slug));
        }

        state.next_id += 1;
        let article = Article {
            id: state.next_id,
            title: draft.title.clone(),
            body: draft.body.clone(),
            tags: tags.to_string(),
            slug: slug.to_string(),
            cover_image: draft.cover_image.clone(),
            created_at: Utc::now(),
        };
        state.articles.push(article.clone());
        Ok(article)
    }

    async fn update(
        &self,
        id: i32,
        draft: &ArticleDraft,
        tags: &str,
        slug: &str,
    ) -> AppResult<Article> {
        let mut state = self.lock();
        if state.articles.iter().any(|a| a.slug == slug && a.id != id) {
            return Err(AppError::slug_conflict(slug));
        }

        let article = state
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("記事"))?;
        article.title = draft.title.clone();
        article.body = draft.body.clone();
        article.tags = tags.to_string();
        article.slug = slug.to_string();
        article.cover_image = draft.cover_image.clone();
        Ok(article.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.lock();
        let before = state.articles.len();
        state.articles.retain(|a| a.id != id);
        if state.articles.len() == before {
            return Err(AppError::not_found("記事"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Article>> {
        Ok(self.lock().articles.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Article>> {
        Ok(self.lock().articles.iter().find(|a| a.slug == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str, excluding_id: Option<i32>) -> AppResult<bool> {
        Ok(self
            .lock()
            .articles
            .iter()
            .any(|a| a.slug == slug && excluding_id != Some(a.id)))
    }

    async fn search(&self, filter: &ArticleFilter, page: PageRequest) -> AppResult<Page<Article>> {
        let state = self.lock();
        let mut matched: Vec<Article> = state
            .articles
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.id.cmp(&a.id));

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn latest(&self, limit: i64) -> AppResult<Vec<Article>> {
        let state = self.lock();
        let mut all: Vec<Article> = state.articles.clone();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }
}
