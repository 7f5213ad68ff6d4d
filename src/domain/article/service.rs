use super::model::{Article, ArticleDraft, ArticleFilter, Page, PageRequest};
use super::repository::ArticleRepository;
use super::slug::slugify;
use super::tags::normalize_tags;
use crate::types::{AppError, AppResult};
use std::sync::Arc;

/// 記事の作成・編集・削除・取得を担うサービス
///
/// リポジトリは依存注入されるため、テスト時にはインメモリ実装を
/// 渡すことでデータベース接続なしに検証できます。
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    /// リポジトリを注入してサービスを作成
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// タイトルから未使用のスラッグを決定する
    ///
    /// `slugify` の結果が既に使われていれば `base-2`, `base-3`, … と
    /// 昇順に探索し、最初に空いているものを返す。編集時は
    /// `excluding_id` で自分自身のスラッグを衝突対象から除外する。
    ///
    /// 読み取りと書き込みの間にロックは張らないため、並行書き込みで
    /// 同じスラッグが選ばれ得る。最終的な裁定はストアの一意性制約が行い、
    /// 敗者には `SlugConflict` が返る（呼び出し側で1回だけ再試行する）。
    pub async fn unique_slug(&self, title: &str, excluding_id: Option<i32>) -> AppResult<String> {
        let base = slugify(title);
        let mut candidate = base.clone();
        let mut n = 2;
        loop {
            if !self.repo.slug_exists(&candidate, excluding_id).await? {
                return Ok(candidate);
            }
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
    }

    /// 記事を作成する
    /// タグを正規化し、一意なスラッグを割り当てて保存する
    pub async fn create(&self, draft: &ArticleDraft) -> AppResult<Article> {
        let tags = normalize_tags(draft.tags.as_deref());
        let slug = self.unique_slug(&draft.title, None).await?;

        match self.repo.insert(draft, &tags, &slug).await {
            // 並行書き込みに敗れた場合はスラッグを再計算して1回だけ再試行
            Err(AppError::SlugConflict { .. }) => {
                let slug = self.unique_slug(&draft.title, None).await?;
                self.repo.insert(draft, &tags, &slug).await
            }
            other => other,
        }
    }

    /// 記事を編集する
    /// タイトルが変わらなければ既存のスラッグが維持される
    /// （自分自身を衝突判定から除外するため）
    pub async fn edit(&self, id: i32, draft: &ArticleDraft) -> AppResult<Article> {
        let tags = normalize_tags(draft.tags.as_deref());
        let slug = self.unique_slug(&draft.title, Some(id)).await?;

        match self.repo.update(id, draft, &tags, &slug).await {
            Err(AppError::SlugConflict { .. }) => {
                let slug = self.unique_slug(&draft.title, Some(id)).await?;
                self.repo.update(id, draft, &tags, &slug).await
            }
            other => other,
        }
    }

    /// 記事を削除する
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }

    /// IDで記事を取得する（存在しなければnot-found）
    pub async fn get_by_id(&self, id: i32) -> AppResult<Article> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("記事"))
    }

    /// スラッグで記事を取得する（存在しなければnot-found）
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<Article> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("記事"))
    }

    /// フィルター条件で記事一覧をページ取得する
    pub async fn list(&self, filter: &ArticleFilter, page: PageRequest) -> AppResult<Page<Article>> {
        self.repo.search(filter, page).await
    }

    /// 最新の記事を取得する（トップページ用）
    pub async fn latest(&self, limit: i64) -> AppResult<Vec<Article>> {
        self.repo.latest(limit).await
    }
}
