use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};
use std::collections::{HashMap, HashSet};

/// サニタイズ許可リスト: {タグ: 許可属性} の明示的な設定テーブル
///
/// 著者入力のMarkdownがブラウザに到達する唯一の経路で使用される。
/// ここに無いタグ・属性は出力から除去される（内側のテキストは保持）。
/// 見出しはh2/h3のみ許可し、class属性はシンタックスハイライト用の
/// ラッパー（code/pre/div/span）と見出しにのみ認める。
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("p", &[]),
    ("h2", &["id", "class"]),
    ("h3", &["id", "class"]),
    ("ul", &[]),
    ("ol", &[]),
    ("li", &[]),
    ("blockquote", &[]),
    ("code", &["class"]),
    ("pre", &["class"]),
    ("a", &["href", "title", "rel", "target"]),
    ("em", &[]),
    ("strong", &[]),
    ("br", &[]),
    ("hr", &[]),
    ("div", &["class"]),
    ("span", &["class"]),
];

/// リンクに許可するプロトコル。それ以外のスキームは除去される
const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// 許可リストテーブルからサニタイザーを構築する
fn sanitizer() -> Builder<'static> {
    let mut tags: HashSet<&str> = HashSet::new();
    let mut tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    for &(tag, attrs) in ALLOWED_TAGS {
        tags.insert(tag);
        if !attrs.is_empty() {
            tag_attributes.insert(tag, attrs.iter().copied().collect());
        }
    }

    let mut builder = Builder::new();
    builder
        .tags(tags)
        .tag_attributes(tag_attributes)
        .generic_attributes(HashSet::new())
        .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
        .link_rel(None);
    builder
}

/// 著者入力のMarkdownをサニタイズ済みHTMLに変換する
///
/// フェンスコードブロックに対応し、言語指定は `language-*` クラスとして
/// `<code>` に残るためシンタックスハイライトのスタイル付けに使える。
/// 変換後のHTMLは許可リストでサニタイズされるので、本文中に埋め込まれた
/// 生のHTMLやスクリプトはここで除去される。
pub fn render_markdown_safe(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut raw_html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut raw_html, parser);

    sanitizer().clean(&raw_html).to_string()
}

/// プレーンテキストをHTMLエスケープする
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 検索語にマッチした箇所を `<mark>` で囲んだHTMLを返す
///
/// 元テキストを先にエスケープするため、ユーザー入力からマークアップが
/// 混入することはない。信頼されるタグはこの関数が挿入する `<mark>` のみ。
/// クエリは空白で分割し、各単語を大文字小文字を区別せずに照合する。
pub fn highlight(text: &str, query: &str) -> String {
    let escaped = escape_html(text);
    let words: Vec<String> = query
        .split_whitespace()
        .map(escape_html)
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return escaped;
    }

    let ranges = match_ranges(&escaped, &words);
    if ranges.is_empty() {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + ranges.len() * 13);
    let mut cursor = 0;
    for (start, end) in ranges {
        out.push_str(&escaped[cursor..start]);
        out.push_str("<mark>");
        out.push_str(&escaped[start..end]);
        out.push_str("</mark>");
        cursor = end;
    }
    out.push_str(&escaped[cursor..]);
    out
}

/// 各単語の出現箇所（バイト範囲）を収集し、重なりをマージして返す
fn match_ranges(text: &str, words: &[String]) -> Vec<(usize, usize)> {
    // 大文字小文字を区別しない照合のため、文字単位で小文字化した列を作る
    let chars: Vec<(usize, char)> = text
        .char_indices()
        .map(|(i, c)| (i, c.to_lowercase().next().unwrap_or(c)))
        .collect();

    let mut ranges = Vec::new();
    for word in words {
        let needle: Vec<char> = word
            .chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect();
        if needle.is_empty() {
            continue;
        }
        let mut i = 0;
        while i + needle.len() <= chars.len() {
            let matched = chars[i..i + needle.len()]
                .iter()
                .map(|&(_, c)| c)
                .eq(needle.iter().copied());
            if matched {
                let start = chars[i].0;
                let end = chars
                    .get(i + needle.len())
                    .map(|&(b, _)| b)
                    .unwrap_or(text.len());
                ranges.push((start, end));
                i += needle.len();
            } else {
                i += 1;
            }
        }
    }

    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    // Markdown変換とサニタイズのテスト
    mod sanitize {
        use super::*;

        #[test]
        fn test_script_stripped_markdown_kept() {
            let html = render_markdown_safe("<script>alert(1)</script>\n\n**hi**");

            assert!(!html.contains("<script"), "scriptタグが残っています: {}", html);
            assert!(!html.contains("alert(1)"), "script内容が残っています: {}", html);
            assert!(html.contains("<strong>hi</strong>"), "強調が描画されていません: {}", html);

            println!("✅ scriptサニタイズテスト成功");
        }

        #[test]
        fn test_heading_levels_restricted() {
            let html = render_markdown_safe("# Top\n\n## Section\n\n### Sub\n\n#### Deep");

            // h1とh4は許可リスト外だがテキストは保持される
            assert!(!html.contains("<h1"));
            assert!(!html.contains("<h4"));
            assert!(html.contains("Top"));
            assert!(html.contains("<h2>Section</h2>"));
            assert!(html.contains("<h3>Sub</h3>"));

            println!("✅ 見出しレベル制限テスト成功");
        }

        #[test]
        fn test_fenced_code_block() {
            let html = render_markdown_safe("```rust\nfn main() {}\n```");

            // 言語指定はハイライト用クラスとしてcodeに残る
            assert!(html.contains("<pre>"));
            assert!(html.contains("language-rust"));

            println!("✅ フェンスコードブロックテスト成功");
        }

        #[test]
        fn test_link_protocols() {
            let safe = render_markdown_safe("[link](https://example.com)");
            assert!(safe.contains("href=\"https://example.com\""));

            let mail = render_markdown_safe("[mail](mailto:a@example.com)");
            assert!(mail.contains("mailto:a@example.com"));

            // 許可外のスキームは除去される
            let unsafe_html = render_markdown_safe("[x](javascript:alert(1))");
            assert!(!unsafe_html.contains("javascript:"));

            println!("✅ リンクプロトコル制限テスト成功");
        }

        #[test]
        fn test_disallowed_attributes_removed() {
            let html = render_markdown_safe("<p onclick=\"pwn()\">hi</p>");

            assert!(!html.contains("onclick"));
            assert!(html.contains("hi"));

            println!("✅ 属性除去テスト成功");
        }

        #[test]
        fn test_highlight_wrappers_allowed() {
            // ハイライト用のdiv/spanはclass付きで通過する
            let html = render_markdown_safe("<span class=\"hl\">x</span>");
            assert!(html.contains("<span class=\"hl\">"));

            println!("✅ ハイライトラッパー許可テスト成功");
        }
    }

    // 検索語ハイライトのテスト
    mod highlight {
        use super::*;

        #[test]
        fn test_escape_before_marking() {
            // ユーザー由来のマークアップはエスケープされ、挿入されるのは<mark>のみ
            let html = highlight("<b>rust</b>", "rust");
            assert_eq!(html, "&lt;b&gt;<mark>rust</mark>&lt;/b&gt;");

            println!("✅ エスケープ優先テスト成功");
        }

        #[test]
        fn test_case_insensitive_match() {
            let html = highlight("Rust is great", "rust");
            assert_eq!(html, "<mark>Rust</mark> is great");

            println!("✅ 大文字小文字無視テスト成功");
        }

        #[test]
        fn test_multiple_words() {
            let html = highlight("learning rust and python", "python rust");
            assert!(html.contains("<mark>rust</mark>"));
            assert!(html.contains("<mark>python</mark>"));

            println!("✅ 複数単語テスト成功");
        }

        #[test]
        fn test_overlapping_matches_merged() {
            // 重なる一致範囲は1つのマーカーにまとめる
            let html = highlight("abcd", "abc bcd");
            assert_eq!(html, "<mark>abcd</mark>");

            println!("✅ 範囲マージテスト成功");
        }

        #[test]
        fn test_no_match_returns_escaped() {
            assert_eq!(highlight("plain & simple", "rust"), "plain &amp; simple");
            assert_eq!(highlight("text", ""), "text");

            println!("✅ 非一致テスト成功");
        }
    }
}
