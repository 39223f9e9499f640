//! バッチ単位のロゴ一括ダウンロード
//!
//! ## 処理フロー
//! 1. ブランド名を参照シートと照合
//! 2. 見つかったブランドの Logo1〜Logo3 をダウンロード
//! 3. 照合結果と保存先をレポート行にまとめる

use crate::downloader::{extension_for_url, refine_extension, save_logo, LogoFetcher};
use crate::error::{LogoBatchError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use logo_batch_common::naming::{clean_brand_key, logo_file_name};
use logo_batch_common::{find_best_match, DownloadRecord, MatchKind, ReferenceBrandRow, LOGO_SLOTS};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// ファイル名に使うブランド名
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameSource {
    /// 参照シートの正式名
    #[default]
    Matched,
    /// 入力されたブランド名
    Query,
}

impl std::str::FromStr for NameSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "matched" | "sheet" => Ok(NameSource::Matched),
            "query" | "input" => Ok(NameSource::Query),
            _ => Err(format!("Unknown name source: {}. Use matched or query", s)),
        }
    }
}

/// 一括ダウンロードのオプション
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub min_image_bytes: u64,
    pub name_source: NameSource,
    /// 進捗バーを表示する
    pub progress: bool,
}

/// 集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    pub images: usize,
    /// Logo1〜Logo3 ごとの保存数
    pub per_slot: [usize; LOGO_SLOTS],
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub batch_id: String,
    pub records: Vec<DownloadRecord>,
    pub summary: BatchSummary,
}

/// ブランド一覧テキストを読む（1行1ブランド、空行は無視）
pub fn parse_brand_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_brand_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(LogoBatchError::FileNotFound(path.display().to_string()));
    }
    Ok(parse_brand_list(&std::fs::read_to_string(path)?))
}

/// 複数バッチの定義（`{"54a": ["Air Canada", ...], ...}`）を読む
pub fn load_batch_plan(path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    if !path.exists() {
        return Err(LogoBatchError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let plan: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)?;
    Ok(plan
        .into_iter()
        .map(|(id, brands)| {
            let brands = brands
                .iter()
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .collect();
            (id, brands)
        })
        .collect())
}

fn progress_bar(len: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

/// 1バッチ分をダウンロード
///
/// # Arguments
/// * `batch_id` - バッチ名（レポート名に使用）
/// * `brands` - 入力ブランド名（この順で処理）
/// * `rows` - 参照シート
/// * `fetcher` - 画像の取得方法
/// * `options` - 保存先など
pub async fn run_batch<F: LogoFetcher>(
    batch_id: &str,
    brands: &[String],
    rows: &[ReferenceBrandRow],
    fetcher: &F,
    options: &BatchOptions,
) -> Result<BatchReport> {
    std::fs::create_dir_all(&options.output_dir)?;

    let mut summary = BatchSummary {
        total: brands.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(brands.len());
    let pb = progress_bar(brands.len(), options.progress);

    for brand in brands {
        let brand = brand.trim();
        pb.set_message(brand.to_string());

        let matched = find_best_match(brand, rows);
        let (row, matched_name) = match (matched.row, matched.matched_name) {
            (Some(row), Some(name)) => (row, name),
            _ => {
                pb.println(format!("❌ {}: 参照シートに見つかりません", brand));
                summary.not_found += 1;
                records.push(DownloadRecord::not_found(brand));
                pb.inc(1);
                continue;
            }
        };

        if matched.kind != MatchKind::Exact {
            pb.println(format!("🔗 {} → {} [{}]", brand, matched_name, matched.kind));
        }
        summary.found += 1;

        let key = match options.name_source {
            NameSource::Matched => clean_brand_key(matched_name),
            NameSource::Query => clean_brand_key(brand),
        };

        let mut record = DownloadRecord {
            brand: brand.to_string(),
            matched_as: matched_name.to_string(),
            match_kind: matched.kind.to_string(),
            ..Default::default()
        };

        for (slot, url) in row.logo_urls() {
            record.logo_urls[slot - 1] = url.to_string();

            match download_one(fetcher, url, &key, slot, options).await {
                Ok(path) => {
                    summary.images += 1;
                    summary.per_slot[slot - 1] += 1;
                    record.logo_paths[slot - 1] = path.display().to_string();
                }
                Err(e) => {
                    tracing::warn!(brand, slot, url, error = %e, "ダウンロード失敗");
                    summary.failed += 1;
                    let short: String = url.chars().take(50).collect();
                    record.logo_paths[slot - 1] = format!("FAILED: {}", short);
                }
            }
        }

        records.push(record);
        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(BatchReport {
        batch_id: batch_id.to_string(),
        records,
        summary,
    })
}

async fn download_one<F: LogoFetcher>(
    fetcher: &F,
    url: &str,
    key: &str,
    slot: usize,
    options: &BatchOptions,
) -> Result<PathBuf> {
    let bytes = fetcher.fetch(url).await?;
    let ext = refine_extension(extension_for_url(url), &bytes);
    let path = options.output_dir.join(logo_file_name(key, slot, ext));

    if save_logo(&bytes, &path, options.min_image_bytes)? {
        Ok(path)
    } else {
        Err(LogoBatchError::Download(format!(
            "画像が小さすぎます（{} bytes）",
            bytes.len()
        )))
    }
}
