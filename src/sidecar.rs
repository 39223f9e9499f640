//! ブランド割り当てファイル
//!
//! バッチフォルダごとに `.brands.json` を置き、ファイル名 → ブランドキーを保存する。
//! 記録のないファイルはファイル名の規約からブランドを推定する（旧来の挙動）。

use crate::error::{LogoBatchError, Result};
use logo_batch_common::grouper::{group_by_brand_with, infer_brand_key};
use logo_batch_common::BrandGroup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SIDECAR_FILE_NAME: &str = ".brands.json";

/// ブランド割り当ての構造
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSidecar {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイル名 → ブランドキー
    entries: BTreeMap<String, String>,
}

impl Default for BrandSidecar {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl BrandSidecar {
    const CURRENT_VERSION: u32 = 1;

    pub fn path(folder: &Path) -> PathBuf {
        folder.join(SIDECAR_FILE_NAME)
    }

    /// 割り当てファイルを読み込み（なければ空、壊れていれば空として扱う）
    pub fn load(folder: &Path) -> Self {
        let sidecar_path = Self::path(folder);
        if !sidecar_path.exists() {
            return Self::default();
        }

        let file = match File::open(&sidecar_path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    path = %sidecar_path.display(),
                    error = %e,
                    "割り当てファイルを開けません"
                );
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, BrandSidecar>(BufReader::new(file)) {
            Ok(sidecar) if sidecar.version == Self::CURRENT_VERSION => sidecar,
            Ok(sidecar) => {
                tracing::warn!(
                    version = sidecar.version,
                    "割り当てファイルのバージョン不一致、無視します"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %sidecar_path.display(),
                    error = %e,
                    "割り当てファイルが壊れています"
                );
                Self::default()
            }
        }
    }

    /// 一時ファイルに書き切ってから置き換える
    pub fn save(&self, folder: &Path) -> Result<()> {
        let sidecar_path = Self::path(folder);
        let temp_path = folder.join(format!("{}.tmp", SIDECAR_FILE_NAME));

        let written = File::create(&temp_path).map_err(LogoBatchError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        std::fs::rename(&temp_path, &sidecar_path)?;
        Ok(())
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(|s| s.as_str())
    }

    pub fn assign(&mut self, file_name: impl Into<String>, brand_key: impl Into<String>) {
        self.entries.insert(file_name.into(), brand_key.into());
    }

    pub fn remove(&mut self, file_name: &str) -> Option<String> {
        self.entries.remove(file_name)
    }

    /// 保存済みのキー、なければファイル名から推定
    pub fn resolve(&self, file_name: &str) -> String {
        self.get(file_name)
            .map(str::to_string)
            .unwrap_or_else(|| infer_brand_key(file_name))
    }

    /// 記録のないファイルに推定キーを書き込む（一度きりの移行用）
    ///
    /// # Returns
    /// 追加した件数
    pub fn migrate<S: AsRef<str>>(&mut self, file_names: &[S]) -> usize {
        let mut added = 0;
        for name in file_names {
            let name = name.as_ref();
            if !self.entries.contains_key(name) {
                self.entries.insert(name.to_string(), infer_brand_key(name));
                added += 1;
            }
        }
        added
    }

    /// フォルダに存在しないファイルの記録を削除
    pub fn prune<S: AsRef<str>>(&mut self, file_names: &[S]) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|name, _| file_names.iter().any(|f| f.as_ref() == name));
        before - self.entries.len()
    }

    /// 保存済みキーを優先してグループ化
    pub fn group<S: AsRef<str>>(&self, file_names: &[S]) -> Vec<BrandGroup> {
        group_by_brand_with(file_names, |name| self.resolve(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
