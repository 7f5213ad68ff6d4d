use super::model::User;
use crate::types::error::is_unique_violation;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;

/// ユーザーストアの抽象化トレイト
///
/// メールアドレスの一意性制約はストア側が最終的に担保し、
/// 違反時には `AppError::EmailTaken` を返します。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを登録する（emailは呼び出し側で小文字化済みであること）
    async fn insert(&self, email: &str, password_hash: &str, is_admin: bool) -> AppResult<User>;

    /// メールアドレスでユーザーを取得する
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// IDでユーザーを取得する
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// 管理者フラグを変更する（運用ツールからのみ使用）
    async fn set_admin(&self, id: i32, is_admin: bool) -> AppResult<()>;
}

/// PostgreSQLを使用した本番用のユーザーリポジトリ実装
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// 接続プールからリポジトリを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, email: &str, password_hash: &str, is_admin: bool) -> AppResult<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, is_admin
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::email_taken(email)
            } else {
                AppError::database("ユーザーの登録", e)
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, is_admin FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("ユーザーのメール検索", e))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, is_admin FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("ユーザーのID検索", e))
    }

    async fn set_admin(&self, id: i32, is_admin: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET is_admin = $2 WHERE id = $1")
            .bind(id)
            .bind(is_admin)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("管理者フラグの更新", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("ユーザー"));
        }
        Ok(())
    }
}

/// テスト用のインメモリユーザーリポジトリ
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    users: Vec<User>,
    next_id: i32,
}

impl InMemoryUserRepository {
    /// 空のリポジトリを作成
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, email: &str, password_hash: &str, is_admin: bool) -> AppResult<User> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == email) {
            return Err(AppError::email_taken(email));
        }

        state.next_id += 1;
        let user = User {
            id: state.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn set_admin(&self, id: i32, is_admin: bool) -> AppResult<()> {
        let mut state = self.lock();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("ユーザー"))?;
        user.is_admin = is_admin;
        Ok(())
    }
}
