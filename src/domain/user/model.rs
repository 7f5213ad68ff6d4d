use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use crate::types::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// ユーザーエンティティ（usersテーブルと一致）
/// パスワードは平文では保持せず、Argon2のPHC文字列のみを保存する
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    /// 小文字化して保存されるメールアドレス（一意）
    pub email: String,
    /// ソルト付きパスワードハッシュ（PHC文字列）
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
}

impl User {
    /// 平文パスワードが保存済みハッシュと一致するかを検証する
    pub fn check_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// 平文パスワードからソルト付きハッシュを生成する
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::password_hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        // 平文は保存されない
        assert!(!hash.contains("correct horse"));
        assert!(hash.starts_with("$argon2"));

        let user = User {
            id: 1,
            email: "a@example.com".to_string(),
            password_hash: hash,
            is_admin: false,
        };
        assert!(user.check_password("correct horse battery staple"));
        assert!(!user.check_password("wrong password"));

        println!("✅ パスワードハッシュ往復テスト成功");
    }

    #[test]
    fn test_salted_hashes_differ() {
        // 同じパスワードでもソルトが異なればハッシュも異なる
        let first = hash_password("secret123").unwrap();
        let second = hash_password("secret123").unwrap();
        assert_ne!(first, second);

        println!("✅ ソルトテスト成功");
    }

    #[test]
    fn test_corrupt_hash_rejects() {
        let user = User {
            id: 1,
            email: "a@example.com".to_string(),
            password_hash: "壊れたハッシュ".to_string(),
            is_admin: false,
        };
        assert!(!user.check_password("anything"));

        println!("✅ 不正ハッシュ拒否テスト成功");
    }
}
