use thiserror::Error;

/// アプリケーション共通のエラー型
/// 複数のモジュールで使用される基盤的なエラーのみを定義
#[derive(Error, Debug)]
pub enum AppError {
    /// 入力値の検証エラー（コアロジック実行前にフォーム層で検出される）
    #[error("入力値が不正です: {message}")]
    Validation { message: String },

    /// 要求されたリソースが存在しない
    #[error("{resource}が見つかりません")]
    NotFound { resource: String },

    /// スラッグの一意性制約違反（並行書き込み時に発生し得る、再試行可能）
    #[error("スラッグが競合しました: {slug}")]
    SlugConflict { slug: String },

    /// メールアドレスの一意性制約違反
    #[error("メールアドレスは既に登録されています: {email}")]
    EmailTaken { email: String },

    /// 未ログイン状態で認証必須の操作を要求した
    #[error("ログインが必要です")]
    LoginRequired,

    /// 管理者以外が管理者専用の操作を要求した
    #[error("管理者権限が必要です")]
    Forbidden,

    /// パスワードハッシュの生成・検証エラー
    #[error("パスワードハッシュ処理に失敗しました: {message}")]
    PasswordHash { message: String },

    /// 設定関連のエラー
    #[error("設定エラー: {message}")]
    Config { message: String },

    /// データベース関連のエラー
    #[error("データベースエラー: {operation} - {source}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    /// 検証エラーを作成
    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// not-foundエラーを作成
    pub fn not_found<R: Into<String>>(resource: R) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// スラッグ競合エラーを作成
    pub fn slug_conflict<S: Into<String>>(slug: S) -> Self {
        Self::SlugConflict { slug: slug.into() }
    }

    /// メールアドレス重複エラーを作成
    pub fn email_taken<E: Into<String>>(email: E) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    /// パスワードハッシュエラーを作成
    pub fn password_hash<M: Into<String>>(message: M) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    /// 設定エラーを作成
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// データベースエラーを作成
    /// 一意性制約違反は呼び出し側で個別の変種（SlugConflict / EmailTaken）に変換する
    pub fn database<O: Into<String>>(operation: O, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    /// 再試行可能なエラーかどうかを判定
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SlugConflict { .. })
    }
}

/// 共通エラーのResult型エイリアス
pub type AppResult<T> = std::result::Result<T, AppError>;

/// sqlxエラーが一意性制約違反かどうかを判定
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
