//! ファイル名・拡張子のユーティリティ

/// アップロード・スキャン対象の拡張子（小文字、ドットなし）
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "webp", "gif"];

/// URLから拡張子を探すときの候補（この順で判定）
const URL_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".svg", ".gif", ".webp"];

/// URLから判別できないときの拡張子
pub const DEFAULT_EXTENSION: &str = ".png";

/// ブランドキーの最大文字数
pub const MAX_KEY_CHARS: usize = 80;

const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// ファイル名の拡張子が許可されているか（大文字小文字を区別しない）
pub fn allowed_extension(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 拡張子（ドットなし）。先頭ドットのみのファイルは拡張子なし
pub fn extension_of(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&file_name[idx + 1..]),
    }
}

/// 入力されたブランド名をファイル名に使えるキーに変換
///
/// 禁止文字を除去し、空白を `_` に置換、連続する `_` を1つにまとめる。
pub fn clean_brand_key(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    let replaced = stripped.trim().replace(' ', "_");

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    collapsed.chars().take(MAX_KEY_CHARS).collect()
}

/// ロゴファイル名 `{key}_logo{slot}{ext}`
///
/// `ext` はドット付き（`.png`）でもドットなし（`png`）でもよい。
pub fn logo_file_name(brand_key: &str, slot: usize, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    format!("{}_logo{}.{}", brand_key, slot, ext)
}

/// URLのパス部分から画像拡張子を判定（ドット付き）
///
/// パスに含まれなければ Wikipedia の URL 全体を見て、それでもなければ `.png`。
/// `decoded_path` はパーセントデコード済みのパスを渡す。
pub fn extension_from_url_path(url: &str, decoded_path: &str) -> &'static str {
    let path = decoded_path.to_lowercase();
    if let Some(ext) = URL_EXTENSIONS.iter().copied().find(|ext| path.contains(ext)) {
        return ext;
    }

    let lower_url = url.to_lowercase();
    if lower_url.contains("wikipedia") {
        if lower_url.contains(".svg") {
            return ".svg";
        }
        if lower_url.contains(".png") {
            return ".png";
        }
        if lower_url.contains(".jpg") || lower_url.contains(".jpeg") {
            return ".jpg";
        }
    }

    DEFAULT_EXTENSION
}
