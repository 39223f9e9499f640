//! Excel出力（CLI版）
//!
//! 共通ライブラリでバッファを生成し、ファイルに書き出す

use crate::error::{LogoBatchError, Result};
use chrono::{DateTime, Local};
use logo_batch_common::export::excel_core::{
    generate_gallery_buffer, generate_report_buffer, unplaced_files,
};
use logo_batch_common::{BrandGroup, DownloadRecord};
use std::path::{Path, PathBuf};

/// `batch_{id}_download_report_{YYYYmmdd_HHMM}.xlsx`
pub fn report_file_name(batch_id: &str, now: DateTime<Local>) -> String {
    format!(
        "batch_{}_download_report_{}.xlsx",
        batch_id,
        now.format("%Y%m%d_%H%M")
    )
}

/// `batch_{id}_logos_{YYYYmmdd_HHMM}.xlsx`
pub fn gallery_file_name(batch_id: &str, now: DateTime<Local>) -> String {
    format!("batch_{}_logos_{}.xlsx", batch_id, now.format("%Y%m%d_%H%M"))
}

/// ダウンロードレポートを書き出す
pub fn write_report(records: &[DownloadRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(records).map_err(LogoBatchError::ExcelGeneration)?;
    write_buffer(&buffer, output_path)
}

/// ブランド一覧を書き出す（4件目以降のロゴは載らないため警告を出す）
pub fn write_gallery(title: &str, groups: &[BrandGroup], output_path: &Path) -> Result<()> {
    for group in groups {
        let skipped = unplaced_files(group);
        if !skipped.is_empty() {
            tracing::warn!(
                brand = %group.brand,
                files = ?skipped,
                "Logo1〜Logo3に入りきらないファイルは一覧に載りません"
            );
        }
    }

    let buffer =
        generate_gallery_buffer(title, groups).map_err(LogoBatchError::ExcelGeneration)?;
    write_buffer(&buffer, output_path)
}

fn write_buffer(buffer: &[u8], output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)
        .map_err(|e| LogoBatchError::ExcelGeneration(format!("保存エラー: {}", e)))
}

/// 出力先がディレクトリならファイル名を付ける
pub fn resolve_output(output: &Path, default_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_name)
    } else {
        output.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_file_name() {
        let now = Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(
            report_file_name("54a", now),
            "batch_54a_download_report_20250307_0905.xlsx"
        );
        assert_eq!(gallery_file_name("54", now), "batch_54_logos_20250307_0905.xlsx");
    }

    #[test]
    fn test_resolve_output() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_output(dir.path(), "r.xlsx"), dir.path().join("r.xlsx"));
        let file = dir.path().join("custom.xlsx");
        assert_eq!(resolve_output(&file, "r.xlsx"), file);
    }
}
