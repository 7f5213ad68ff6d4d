use crate::infra::config::AppConfig;
use crate::types::{AppError, AppResult};
use sqlx::PgPool;

/// データベース接続プールを作成
pub async fn create_pool(config: &AppConfig) -> AppResult<PgPool> {
    PgPool::connect(&config.database_url)
        .await
        .map_err(|e| AppError::database("データベース接続プール作成", e))
}

/// データベースの初期化（マイグレーション実行）
pub async fn initialize_database(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database("データベースマイグレーション実行", e.into()))
}

/// プールの作成とデータベース初期化を一括で行う便利関数
pub async fn setup_database(config: &AppConfig) -> AppResult<PgPool> {
    let pool = create_pool(config).await?;
    initialize_database(&pool).await?;
    Ok(pool)
}
