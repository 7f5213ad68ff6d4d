use super::model::{hash_password, User};
use super::repository::UserRepository;
use crate::types::{AppError, AppResult};
use std::sync::Arc;

/// 登録・認証を担うサービス
///
/// セッション管理はこのコアの外側（ビュー/ルーティング層）の責務であり、
/// ここでは「誰がログインしているか」は引数で受け取るだけです。
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
}

impl AuthService {
    /// リポジトリを注入してサービスを作成
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// 新規ユーザーを登録する
    /// メールアドレスは小文字化して保存し、重複していればエラーを返す
    pub async fn register(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::email_taken(&email));
        }

        let password_hash = hash_password(password)?;
        // 読み取りと挿入の間に他の登録が割り込んだ場合は
        // ストアの一意性制約がEmailTakenとして返す
        self.repo.insert(&email, &password_hash, false).await
    }

    /// メールアドレスとパスワードで認証する
    /// ユーザーが存在しない場合もパスワード不一致の場合も同じエラーを返す
    /// （登録済みメールアドレスの探索を許さないため）
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        match self.repo.find_by_email(&email).await? {
            Some(user) if user.check_password(password) => Ok(user),
            _ => Err(AppError::validation(
                "メールアドレスまたはパスワードが正しくありません",
            )),
        }
    }

    /// IDでユーザーを取得する（セッション復元用）
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    /// 管理者フラグを付与・剥奪する（運用ツールからのみ使用）
    pub async fn set_admin(&self, id: i32, is_admin: bool) -> AppResult<()> {
        self.repo.set_admin(id, is_admin).await
    }
}

/// 管理者専用操作のガード
///
/// 未ログインなら `LoginRequired`、ログイン済みでも管理者でなければ
/// `Forbidden` を返す。黙ってno-opに降格することはない。
pub fn require_admin(user: Option<&User>) -> AppResult<&User> {
    let user = user.ok_or(AppError::LoginRequired)?;
    if !user.is_admin {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::super::repository::InMemoryUserRepository;
    use super::*;

    fn auth() -> AuthService {
        AuthService::new(Arc::new(InMemoryUserRepository::new()))
    }

    mod domain {
        use super::*;

        #[tokio::test]
        async fn test_register_lowercases_email() {
            let svc = auth();
            let user = svc.register("Alice@Example.COM", "secret123").await.unwrap();
            assert_eq!(user.email, "alice@example.com");
            assert!(!user.is_admin);

            println!("✅ メール小文字化テスト成功");
        }

        #[tokio::test]
        async fn test_register_duplicate_email() {
            let svc = auth();
            svc.register("a@example.com", "secret123").await.unwrap();

            // 大文字小文字が違っても同一メールとして扱う
            let result = svc.register("A@EXAMPLE.COM", "other456").await;
            assert!(matches!(result, Err(AppError::EmailTaken { .. })));

            println!("✅ 重複登録拒否テスト成功");
        }

        #[tokio::test]
        async fn test_authenticate() {
            let svc = auth();
            svc.register("a@example.com", "secret123").await.unwrap();

            let user = svc.authenticate("a@example.com", "secret123").await.unwrap();
            assert_eq!(user.email, "a@example.com");

            // 不正パスワードと未登録メールは同じエラーになる
            let wrong_password = svc.authenticate("a@example.com", "wrong").await;
            let unknown_email = svc.authenticate("b@example.com", "secret123").await;
            assert_eq!(
                wrong_password.unwrap_err().to_string(),
                unknown_email.unwrap_err().to_string()
            );

            println!("✅ 認証テスト成功");
        }
    }

    mod guard {
        use super::*;

        fn user(is_admin: bool) -> User {
            User {
                id: 1,
                email: "a@example.com".to_string(),
                password_hash: String::new(),
                is_admin,
            }
        }

        #[test]
        fn test_require_admin() {
            // 未ログイン
            assert!(matches!(require_admin(None), Err(AppError::LoginRequired)));
            // 一般ユーザー
            let member = user(false);
            assert!(matches!(
                require_admin(Some(&member)),
                Err(AppError::Forbidden)
            ));
            // 管理者
            let admin = user(true);
            assert!(require_admin(Some(&admin)).is_ok());

            println!("✅ 管理者ガードテスト成功");
        }
    }
}
