use super::forms::ArticleForm;
use crate::domain::article::{Article, ArticleService};
use crate::domain::user::{require_admin, User};
use crate::types::AppResult;

/// 記事を作成する（管理者専用）
///
/// 成功時はルーティング層が `article_path(&article.slug)` へ
/// リダイレクトすることを想定している。
pub async fn create_article(
    service: &ArticleService,
    current_user: Option<&User>,
    form: &ArticleForm,
) -> AppResult<Article> {
    require_admin(current_user)?;
    form.validate()?;
    service.create(&form.to_draft()).await
}

/// 記事を編集する（管理者専用）
/// タイトルが変わった場合はスラッグが再割り当てされることがある
pub async fn update_article(
    service: &ArticleService,
    current_user: Option<&User>,
    id: i32,
    form: &ArticleForm,
) -> AppResult<Article> {
    require_admin(current_user)?;
    form.validate()?;
    service.edit(id, &form.to_draft()).await
}

/// 記事を削除する（管理者専用）
/// 成功時はルーティング層が記事一覧へリダイレクトする
pub async fn delete_article(
    service: &ArticleService,
    current_user: Option<&User>,
    id: i32,
) -> AppResult<()> {
    require_admin(current_user)?;
    service.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::InMemoryArticleRepository;
    use crate::types::AppError;
    use std::sync::Arc;

    fn service() -> ArticleService {
        ArticleService::new(Arc::new(InMemoryArticleRepository::new()))
    }

    fn admin() -> User {
        User {
            id: 1,
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            is_admin: true,
        }
    }

    fn member() -> User {
        User {
            id: 2,
            email: "member@example.com".to_string(),
            password_hash: String::new(),
            is_admin: false,
        }
    }

    fn form(title: &str) -> ArticleForm {
        ArticleForm {
            title: title.to_string(),
            body: "本文".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let svc = service();

        // 未ログイン
        let result = create_article(&svc, None, &form("A")).await;
        assert!(matches!(result, Err(AppError::LoginRequired)));
        // 一般ユーザー
        let user = member();
        let result = create_article(&svc, Some(&user), &form("A")).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
        // 権限がない場合は記事が作られない
        let listing = svc
            .list(&Default::default(), crate::domain::article::PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(listing.total, 0);

        println!("✅ 作成権限ガードテスト成功");
    }

    #[tokio::test]
    async fn test_create_validates_before_core_logic() {
        let svc = service();
        let user = admin();

        let invalid = ArticleForm::default();
        let result = create_article(&svc, Some(&user), &invalid).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        println!("✅ 作成前検証テスト成功");
    }

    #[tokio::test]
    async fn test_create_update_delete_flow() {
        let svc = service();
        let user = admin();

        let article = create_article(&svc, Some(&user), &form("Hello World"))
            .await
            .unwrap();
        assert_eq!(article.slug, "hello-world");

        let updated = update_article(&svc, Some(&user), article.id, &form("Hello World"))
            .await
            .unwrap();
        // タイトルが同じなのでスラッグは維持される
        assert_eq!(updated.slug, "hello-world");

        delete_article(&svc, Some(&user), article.id).await.unwrap();
        let result = svc.get_by_id(article.id).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));

        println!("✅ 作成・更新・削除フローテスト成功");
    }
}
