use super::{article_path, Outcome, ARTICLES_PATH};
use crate::domain::article::{
    highlight, render_markdown_safe, Article, ArticleFilter, ArticleService, PageRequest,
};
use crate::types::AppResult;
use serde::Serialize;

/// トップページに表示する最新記事の件数
const HOME_LATEST_COUNT: i64 = 5;

/// 一覧に表示する記事の要約ビューモデル
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: i32,
    pub title: String,
    /// エスケープ済みタイトル。検索時は一致箇所が `<mark>` で囲まれる
    pub title_html: String,
    pub tags: Vec<String>,
    pub slug: String,
    pub cover_image: Option<String>,
}

impl ArticleSummary {
    fn from_article(article: &Article, query: Option<&str>) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            title_html: highlight(&article.title, query.unwrap_or("")),
            tags: article.tag_list().iter().map(|t| t.to_string()).collect(),
            slug: article.slug.clone(),
            cover_image: article.cover_image.clone(),
        }
    }
}

/// トップページのビューモデル
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub latest: Vec<ArticleSummary>,
}

/// 記事一覧ページのビューモデル
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub items: Vec<ArticleSummary>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub has_prev: bool,
    pub has_next: bool,
    /// タグ絞り込み中のタグ（ビューが「絞り込み解除」リンクを描画する）
    pub active_tag: Option<String>,
    /// 検索中のクエリ
    pub query: Option<String>,
}

/// 記事詳細ページのビューモデル
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub article: Article,
    /// サニタイズ済みのHTML。本文がビューに渡る唯一の形
    pub body_html: String,
}

/// トップページ: 最新記事を表示する
pub async fn home(articles: &ArticleService) -> AppResult<HomeView> {
    let latest = articles.latest(HOME_LATEST_COUNT).await?;
    Ok(HomeView {
        latest: latest
            .iter()
            .map(|a| ArticleSummary::from_article(a, None))
            .collect(),
    })
}

/// 記事一覧: タグ絞り込み・検索・ページネーションを共通で扱う
///
/// 空白のみの検索クエリはエンジンに渡さず、絞り込みなしの一覧へ
/// リダイレクトする。検索時はタイトルの一致箇所をハイライトする。
pub async fn articles(
    service: &ArticleService,
    per_page: i64,
    tag: Option<&str>,
    query: Option<&str>,
    page: i64,
) -> AppResult<Outcome<ListingView>> {
    let query = query.map(str::trim);
    if query.is_some_and(str::is_empty) {
        return Ok(Outcome::Redirect(ARTICLES_PATH.to_string()));
    }

    let filter = match (query, tag) {
        (Some(q), _) => ArticleFilter::Query(q.to_string()),
        (None, Some(t)) => ArticleFilter::Tag(t.to_string()),
        (None, None) => ArticleFilter::All,
    };

    let result = service
        .list(&filter, PageRequest::new(page, per_page))
        .await?;

    Ok(Outcome::View(ListingView {
        items: result
            .items
            .iter()
            .map(|a| ArticleSummary::from_article(a, query))
            .collect(),
        total: result.total,
        page: result.page,
        per_page: result.per_page,
        has_prev: result.has_prev,
        has_next: result.has_next,
        active_tag: tag.map(|t| t.to_string()),
        query: query.map(|q| q.to_string()),
    }))
}

/// 記事詳細: スラッグで取得し、本文をサニタイズ済みHTMLに変換する
pub async fn article_by_slug(service: &ArticleService, slug: &str) -> AppResult<ArticleView> {
    let article = service.get_by_slug(slug).await?;
    let body_html = render_markdown_safe(&article.body);
    Ok(ArticleView { article, body_html })
}

/// 旧ID形式のURLからスラッグURLへのリダイレクト
pub async fn article_by_id(
    service: &ArticleService,
    id: i32,
) -> AppResult<Outcome<ArticleView>> {
    let article = service.get_by_id(id).await?;
    Ok(Outcome::Redirect(article_path(&article.slug)))
}
