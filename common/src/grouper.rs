//! ブランドグルーピング
//!
//! フォルダ内のロゴファイル名をブランド単位にまとめる。
//! ファイル名の規約からブランドキーを推定する:
//! - `Brand_logo1.png` → `Brand`（最後の `_logo` より前）
//! - `Brand_3.png` → `Brand`（末尾が数字のみ）
//! - `Brand_West.png` → `Brand_West`（分割しない）
//!
//! `_logo` の検出は大文字小文字を区別しないが、残ったキーは
//! バイト単位で比較するため `Brand_LOGO1` と `brand_logo2` は別グループになる。

use crate::types::{BrandGroup, LogoFile};
use regex::Regex;
use std::collections::HashMap;

const LOGO_MARKER: &str = "_logo";

/// 10進数字（Nd）以外で数字として扱う文字（上付き・丸数字など）
const DIGIT_RANGES: &[(char, char)] = &[
    ('\u{00B2}', '\u{00B3}'),
    ('\u{00B9}', '\u{00B9}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19DA}', '\u{19DA}'),
    ('\u{2070}', '\u{2070}'),
    ('\u{2074}', '\u{2079}'),
    ('\u{2080}', '\u{2089}'),
    ('\u{2460}', '\u{2468}'),
    ('\u{2474}', '\u{247C}'),
    ('\u{2488}', '\u{2490}'),
    ('\u{24EA}', '\u{24EA}'),
    ('\u{24F5}', '\u{24FD}'),
    ('\u{24FF}', '\u{24FF}'),
    ('\u{2776}', '\u{277E}'),
    ('\u{2780}', '\u{2788}'),
    ('\u{278A}', '\u{2792}'),
    ('\u{10A40}', '\u{10A43}'),
    ('\u{10E60}', '\u{10E68}'),
    ('\u{11052}', '\u{1105A}'),
    ('\u{1F100}', '\u{1F10A}'),
];

/// 数字1文字か（全角数字・上付き数字を含む。分数やローマ数字は含まない）
fn is_digit(c: char) -> bool {
    lazy_static::lazy_static! {
        static ref DECIMAL_RE: Regex = Regex::new(r"^\d$").unwrap();
    }

    if c.is_ascii_digit() {
        return true;
    }
    if !c.is_numeric() {
        return false;
    }
    let mut buf = [0u8; 4];
    DECIMAL_RE.is_match(c.encode_utf8(&mut buf))
        || DIGIT_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// ファイル名から拡張子を除いた部分
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}

/// `_logo` の最後の出現位置（ASCII大文字小文字を無視）
fn rfind_marker(stem: &str) -> Option<usize> {
    let bytes = stem.as_bytes();
    let marker = LOGO_MARKER.as_bytes();
    if bytes.len() < marker.len() {
        return None;
    }
    (0..=bytes.len() - marker.len())
        .rev()
        .find(|&i| bytes[i..i + marker.len()].eq_ignore_ascii_case(marker))
}

/// ファイル名からブランドキーを推定
pub fn infer_brand_key(file_name: &str) -> String {
    let stem = file_stem(file_name);

    if let Some(idx) = rfind_marker(stem) {
        return stem[..idx].to_string();
    }

    match stem.rsplit_once('_') {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(is_digit) => head.to_string(),
        _ => stem.to_string(),
    }
}

/// ブランドキーを表示名に変換
pub fn display_name(brand_key: &str) -> String {
    brand_key.replace('_', " ")
}

/// ファイル名からLogoFileを導出
pub fn classify(file_name: &str) -> LogoFile {
    let brand_key = infer_brand_key(file_name);
    let brand_display = display_name(&brand_key);
    LogoFile {
        file_name: file_name.to_string(),
        brand_key,
        brand_display,
    }
}

/// ファイル名の推定規則でブランドごとにグループ化
///
/// グループ内のファイル順は入力順。安定した順序が必要なら呼び出し側でソートしておく。
pub fn group_by_brand<S: AsRef<str>>(file_names: &[S]) -> Vec<BrandGroup> {
    group_by_brand_with(file_names, infer_brand_key)
}

/// 任意のキー関数でブランドごとにグループ化
///
/// # Arguments
/// * `file_names` - ファイル名（走査順）
/// * `key_fn` - ファイル名 → ブランドキー
///
/// # Returns
/// 表示名の小文字順にソートされたグループ
pub fn group_by_brand_with<S, F>(file_names: &[S], key_fn: F) -> Vec<BrandGroup>
where
    S: AsRef<str>,
    F: Fn(&str) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<BrandGroup> = Vec::new();

    for name in file_names {
        let name = name.as_ref();
        let key = key_fn(name);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push(BrandGroup {
                    brand: display_name(&key),
                    files: Vec::new(),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].files.push(name.to_string());
    }

    groups.sort_by_cached_key(|g| g.brand.to_lowercase());
    groups
}
