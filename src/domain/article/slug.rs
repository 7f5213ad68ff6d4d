use unicode_normalization::UnicodeNormalization;

/// スラッグ生成に失敗した場合のフォールバック
const FALLBACK_SLUG: &str = "post";

/// タイトルからURL安全なスラッグを生成する
///
/// 変換手順:
/// 1. NFKD正規化してASCII以外のコードポイントを除去
/// 2. 小文字化し、単語文字（英数字とアンダースコア）・空白・ハイフン以外を除去
/// 3. 連続する空白・ハイフンを単一のハイフンに畳み込み、先頭末尾のハイフンを除去
/// 4. 結果が空なら `"post"` にフォールバック
///
/// 一意性は保証しない（それは一意性リゾルバーの責務）。
pub fn slugify(title: &str) -> String {
    let ascii: String = title.nfkd().filter(char::is_ascii).collect();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        }
        // その他の記号は単に除去する
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
