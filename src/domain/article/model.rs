use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 記事エンティティ（articlesテーブルと一致）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i32,
    pub title: String,
    /// Markdown形式の本文。ビューへ渡す前に必ずサニタイズを通す
    pub body: String,
    /// 正規化済みのカンマ区切りタグ文字列（空文字列もあり得る）
    pub tags: String,
    /// URL用の一意な識別子
    pub slug: String,
    /// カバー画像のURLまたは相対パス
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// 正規化済みタグ文字列を個々のタグに分解する
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split(", ").filter(|t| !t.is_empty()).collect()
    }
}

/// 記事の作成・編集入力
/// tagsは未正規化の自由入力、cover_imageは空文字列をNoneとして扱う
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub body: String,
    pub tags: Option<String>,
    pub cover_image: Option<String>,
}

/// 一覧・検索のフィルター条件
#[derive(Debug, Clone, Default)]
pub enum ArticleFilter {
    /// 全件
    #[default]
    All,
    /// タグ部分一致（大文字小文字を区別しない）
    Tag(String),
    /// タイトルまたは本文の部分一致（大文字小文字を区別しない）
    Query(String),
}

impl ArticleFilter {
    /// 記事がフィルター条件に一致するかを判定
    /// PostgreSQL実装のILIKE条件と同じ意味論を持つ
    pub fn matches(&self, article: &Article) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => article.tags.to_lowercase().contains(&tag.to_lowercase()),
            Self::Query(q) => {
                let q = q.to_lowercase();
                article.title.to_lowercase().contains(&q)
                    || article.body.to_lowercase().contains(&q)
            }
        }
    }
}

/// ページリクエスト（1始まり）
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// ページ番号・件数を1以上に丸めて作成
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// 先頭からのオフセット
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// ページネーション結果
/// items以外はビュー層がページャーを描画するためのメタデータ
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// ページメタデータを計算して作成
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            has_prev: request.page > 1,
            has_next: request.page * request.per_page < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i32, title: &str, body: &str, tags: &str) -> Article {
        Article {
            id,
            title: title.to_string(),
            body: body.to_string(),
            tags: tags.to_string(),
            slug: format!("article-{}", id),
            cover_image: None,
            created_at: Utc::now(),
        }
    }

    // ドメインロジック・振る舞い系テスト
    mod domain {
        use super::*;

        #[test]
        fn test_filter_matches() {
            let a = article(1, "Flask入門", "PythonでWebアプリを作る", "python, flask");

            // タグ部分一致（大文字小文字を区別しない）
            assert!(ArticleFilter::Tag("py".to_string()).matches(&a));
            assert!(ArticleFilter::Tag("FLASK".to_string()).matches(&a));
            assert!(!ArticleFilter::Tag("go".to_string()).matches(&a));
            // タイトルまたは本文の部分一致
            assert!(ArticleFilter::Query("flask".to_string()).matches(&a));
            assert!(ArticleFilter::Query("web".to_string()).matches(&a));
            assert!(!ArticleFilter::Query("rust".to_string()).matches(&a));
            // 全件
            assert!(ArticleFilter::All.matches(&a));

            println!("✅ フィルター判定テスト成功");
        }

        #[test]
        fn test_tag_list() {
            let a = article(1, "t", "b", "go, python");
            assert_eq!(a.tag_list(), vec!["go", "python"]);

            let empty = article(2, "t", "b", "");
            assert!(empty.tag_list().is_empty());

            println!("✅ タグ分解テスト成功");
        }
    }

    // ページネーション計算のテスト
    mod pagination {
        use super::*;

        #[test]
        fn test_page_metadata_first_page() {
            // 23件・10件ずつ: 1ページ目は前なし次あり
            let items: Vec<i32> = (0..10).collect();
            let page = Page::new(items, 23, PageRequest::new(1, 10));

            assert_eq!(page.items.len(), 10);
            assert_eq!(page.total, 23);
            assert!(!page.has_prev);
            assert!(page.has_next);

            println!("✅ 1ページ目メタデータテスト成功");
        }

        #[test]
        fn test_page_metadata_last_page() {
            // 23件・10件ずつ: 3ページ目は3件で前あり次なし
            let items: Vec<i32> = (0..3).collect();
            let page = Page::new(items, 23, PageRequest::new(3, 10));

            assert_eq!(page.items.len(), 3);
            assert!(page.has_prev);
            assert!(!page.has_next);

            println!("✅ 最終ページメタデータテスト成功");
        }

        #[test]
        fn test_page_request_normalization() {
            // 0以下の値は1に丸める
            let req = PageRequest::new(0, -5);
            assert_eq!(req.page, 1);
            assert_eq!(req.per_page, 1);
            assert_eq!(req.offset(), 0);

            let req = PageRequest::new(3, 10);
            assert_eq!(req.offset(), 20);

            println!("✅ ページリクエスト正規化テスト成功");
        }
    }
}
