use crate::error::{LogoBatchError, Result};
use logo_batch_common::naming::allowed_extension;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct LogoInfo {
    pub file_name: String,
    pub size: u64,
}

/// ルート直下のバッチフォルダ名（名前順）
pub fn scan_batches(root: &Path) -> Result<Vec<String>> {
    if !root.exists() {
        return Err(LogoBatchError::FolderNotFound(root.display().to_string()));
    }

    let mut batches: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.'))
        .collect();

    batches.sort();
    Ok(batches)
}

/// フォルダ直下のロゴ画像（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<LogoInfo>> {
    if !folder.is_dir() {
        return Err(LogoBatchError::FolderNotFound(folder.display().to_string()));
    }

    let mut logos = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !allowed_extension(&file_name) {
            tracing::trace!(file = %file_name, "対象外の拡張子");
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        logos.push(LogoInfo {
            file_name,
            size,
        });
    }

    // ファイル名でソート
    logos.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(logos)
}

/// スキャン結果のファイル名だけを取り出す
pub fn file_names(logos: &[LogoInfo]) -> Vec<String> {
    logos.iter().map(|l| l.file_name.clone()).collect()
}
