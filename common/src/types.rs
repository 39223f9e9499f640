//! ロゴ・ブランドの型定義
//!
//! CLIとライブラリで共有される型:
//! - LogoFile: ファイル名から導出したブランド情報
//! - BrandGroup: ブランド単位にまとめたロゴファイル
//! - ReferenceBrandRow: 参照シート（Brand, Logo1-3）の1行
//! - MatchKind / MatchResult: ブランド照合の結果

use serde::{Deserialize, Serialize};
use std::fmt;

/// ブランドに属すると推定されるロゴファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoFile {
    pub file_name: String,
    /// 正規化前のブランドキー（区切りは `_`）
    pub brand_key: String,
    /// 表示名（`_` を空白に置換）
    pub brand_display: String,
}

/// 同じブランドキーを持つロゴファイルの集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandGroup {
    /// 表示名
    pub brand: String,
    /// 入力順のファイル名
    pub files: Vec<String>,
}

/// 参照シートのロゴURL列数（Logo1〜Logo3）
pub const LOGO_SLOTS: usize = 3;

/// 参照シート（既知ブランド表）の1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceBrandRow {
    /// 正式ブランド名
    pub name: String,
    /// 照合用の小文字名
    pub name_lower: String,
    /// Logo1〜Logo3 のURL
    #[serde(default)]
    pub logos: [Option<String>; LOGO_SLOTS],
}

impl ReferenceBrandRow {
    /// 名前から行を作成（`name_lower` は trim + 小文字化）
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name_lower = name.trim().to_lowercase();
        Self {
            name,
            name_lower,
            logos: Default::default(),
        }
    }

    pub fn with_logo(mut self, slot: usize, url: impl Into<String>) -> Self {
        if (1..=LOGO_SLOTS).contains(&slot) {
            self.logos[slot - 1] = Some(url.into());
        }
        self
    }

    /// 空でないロゴURLを (スロット番号, URL) で列挙
    pub fn logo_urls(&self) -> impl Iterator<Item = (usize, &str)> {
        self.logos
            .iter()
            .enumerate()
            .filter_map(|(i, url)| url.as_deref().map(|u| (i + 1, u)))
    }
}

/// 照合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// 完全一致
    Exact,
    /// 行の名前がクエリに含まれる
    Contains,
    /// クエリが行の名前に含まれる
    Partial,
    /// 単語の共通数（2以上）
    Fuzzy(usize),
    NotFound,
}

impl MatchKind {
    pub fn is_found(&self) -> bool {
        !matches!(self, MatchKind::NotFound)
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "EXACT"),
            MatchKind::Contains => write!(f, "CONTAINS"),
            MatchKind::Partial => write!(f, "PARTIAL"),
            MatchKind::Fuzzy(score) => write!(f, "FUZZY({})", score),
            MatchKind::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// ブランド照合結果（クエリごとに計算、保存しない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub row: Option<&'a ReferenceBrandRow>,
    pub kind: MatchKind,
    /// 一致した正式ブランド名
    pub matched_name: Option<&'a str>,
}

impl<'a> MatchResult<'a> {
    pub fn found(row: &'a ReferenceBrandRow, kind: MatchKind) -> Self {
        Self {
            row: Some(row),
            kind,
            matched_name: Some(row.name.as_str()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            row: None,
            kind: MatchKind::NotFound,
            matched_name: None,
        }
    }
}

/// ダウンロードレポートの1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    /// 入力されたブランド名
    pub brand: String,
    /// 一致した正式名（見つからなければ `NOT FOUND`）
    pub matched_as: String,
    /// 照合方式（`EXACT` など）
    pub match_kind: String,
    /// 保存先パス、または `FAILED: ...`
    pub logo_paths: [String; LOGO_SLOTS],
    pub logo_urls: [String; LOGO_SLOTS],
}

impl DownloadRecord {
    pub const NOT_FOUND: &'static str = "NOT FOUND";

    /// 参照シートに見つからなかったブランドの行
    pub fn not_found(brand: impl Into<String>) -> Self {
        let mut record = Self {
            brand: brand.into(),
            matched_as: Self::NOT_FOUND.to_string(),
            match_kind: MatchKind::NotFound.to_string(),
            ..Default::default()
        };
        record.logo_paths[0] = Self::NOT_FOUND.to_string();
        record
    }

    /// 保存できたロゴ数
    pub fn downloaded_count(&self) -> usize {
        self.logo_paths
            .iter()
            .filter(|p| !p.is_empty() && !p.starts_with("FAILED") && *p != Self::NOT_FOUND)
            .count()
    }
}
