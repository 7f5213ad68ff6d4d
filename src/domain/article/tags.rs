use std::collections::HashSet;

/// 自由入力のカンマ区切りタグ文字列を正規化する
///
/// - カンマで分割し、各要素をトリムして小文字化
/// - 空要素は除去
/// - 初出順を保ったまま重複を除去
/// - `", "` で結合して返す
///
/// 正規化済みの文字列を再度渡しても結果は変わらない（冪等）。
pub fn normalize_tags(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for piece in raw.split(',') {
        let tag = piece.trim().to_lowercase();
        if tag.is_empty() || !seen.insert(tag.clone()) {
            continue;
        }
        tags.push(tag);
    }
    tags.join(", ")
}
