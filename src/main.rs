use anyhow::{Context, Result};
use bloggo::domain::article::{ArticleService, PgArticleRepository};
use bloggo::domain::user::{AuthService, PgUserRepository};
use bloggo::infra::{setup_database, AppConfig};
use bloggo::types::AppError;
use std::sync::Arc;

/// データベースの初期化と管理者アカウントのシードを行う運用エントリポイント
/// Webサーバー本体はこのコアを組み込む側（ルーティング層）が起動する
#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();

    println!("=== ブログ基盤の初期化を開始 ===");
    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;
    let pool = setup_database(&config)
        .await
        .context("データベースの初期化に失敗しました")?;
    println!("マイグレーション完了");

    // 管理者アカウントのシード（ADMIN_EMAIL / ADMIN_PASSWORD 設定時のみ）
    let auth = AuthService::new(Arc::new(PgUserRepository::new(pool.clone())));
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        match auth.register(email, password).await {
            Ok(user) => {
                auth.set_admin(user.id, true)
                    .await
                    .context("管理者フラグの付与に失敗しました")?;
                println!("管理者アカウントを作成しました: {}", user.email);
            }
            Err(AppError::EmailTaken { email }) => {
                println!("管理者アカウントは登録済みです: {}", email);
            }
            Err(e) => return Err(e).context("管理者アカウントの作成に失敗しました"),
        }
    }

    // 現在の記事状況を表示
    let articles = ArticleService::new(Arc::new(PgArticleRepository::new(pool)));
    let latest = articles.latest(5).await.context("最新記事の取得に失敗しました")?;
    if latest.is_empty() {
        println!("記事はまだありません");
    } else {
        println!("最新記事 {}件:", latest.len());
        for article in &latest {
            println!("- {} (/a/{})", article.title, article.slug);
        }
    }

    println!("=== 初期化完了 ===");
    Ok(())
}
