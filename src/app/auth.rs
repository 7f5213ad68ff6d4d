use super::forms::{LoginForm, RegisterForm};
use crate::domain::user::{AuthService, User};
use crate::types::AppResult;

/// 新規ユーザーを登録する
///
/// 成功時はルーティング層がセッションを開始（ログイン）する。
/// 登録済みメールアドレスの場合は `EmailTaken` が返る。
pub async fn register(auth: &AuthService, form: &RegisterForm) -> AppResult<User> {
    form.validate()?;
    auth.register(&form.email, &form.password).await
}

/// メールアドレスとパスワードでログインする
/// 失敗理由（未登録/パスワード不一致）は呼び出し側に区別させない
pub async fn login(auth: &AuthService, form: &LoginForm) -> AppResult<User> {
    form.validate()?;
    auth.authenticate(&form.email, &form.password).await
}
