use crate::domain::article::ArticleDraft;
use crate::types::{AppError, AppResult};

/// タイトルの最大文字数（articlesテーブルの列幅と一致）
pub const TITLE_MAX_LEN: usize = 200;

/// パスワードの最小文字数
pub const PASSWORD_MIN_LEN: usize = 6;

/// 記事の作成・編集フォーム
/// 検証はコアロジック実行前にここで行う
#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub tags: String,
    pub body: String,
    pub cover_image: String,
}

impl ArticleForm {
    /// 入力値を検証する
    pub fn validate(&self) -> AppResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("タイトルは必須です"));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(AppError::validation(format!(
                "タイトルは{}文字以内で入力してください",
                TITLE_MAX_LEN
            )));
        }
        if self.body.trim().is_empty() {
            return Err(AppError::validation("本文は必須です"));
        }
        Ok(())
    }

    /// 検証済みフォームをドラフトに変換する
    /// 空のタグ・カバー画像はNoneとして扱う
    pub fn to_draft(&self) -> ArticleDraft {
        let cover_image = self.cover_image.trim();
        let tags = self.tags.trim();
        ArticleDraft {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            tags: (!tags.is_empty()).then(|| tags.to_string()),
            cover_image: (!cover_image.is_empty()).then(|| cover_image.to_string()),
        }
    }
}

/// ユーザー登録フォーム
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl RegisterForm {
    /// 入力値を検証する
    pub fn validate(&self) -> AppResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("メールアドレスの形式が正しくありません"));
        }
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(AppError::validation(format!(
                "パスワードは{}文字以上で入力してください",
                PASSWORD_MIN_LEN
            )));
        }
        if self.password != self.confirm {
            return Err(AppError::validation("確認用パスワードが一致しません"));
        }
        Ok(())
    }
}

/// ログインフォーム
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    /// 入力値を検証する
    pub fn validate(&self) -> AppResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::validation("メールアドレスとパスワードは必須です"));
        }
        Ok(())
    }
}
