//! ロゴライブラリ（バッチフォルダの追加・改名・削除）
//!
//! `<root>/<batch>/` 配下のロゴファイルをブランド単位で操作する。
//! ブランドの所属は `.brands.json` に記録し、記録がなければファイル名から推定する。

use crate::error::{LogoBatchError, Result};
use crate::scanner::{self, file_names};
use crate::sidecar::BrandSidecar;
use logo_batch_common::grouper::{display_name, file_stem};
use logo_batch_common::naming::{allowed_extension, clean_brand_key, extension_of, logo_file_name};
use logo_batch_common::BrandGroup;
use rayon::prelude::*;
use std::path::{Component, Path, PathBuf};

/// 1要素のパスだけを結合（`..`・絶対パス・区切り文字を拒否）
pub fn safe_join(base: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if !name.contains(['/', '\\']) => {
            Ok(base.join(part))
        }
        _ => Err(LogoBatchError::PathEscape(name.to_string())),
    }
}

/// 改名・削除の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    /// (旧ファイル名, 新ファイル名)
    pub renamed: Vec<(String, String)>,
}

pub struct LogoLibrary {
    root: PathBuf,
}

impl LogoLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn batches(&self) -> Result<Vec<String>> {
        scanner::scan_batches(&self.root)
    }

    /// バッチフォルダのパス（存在しなければ BatchNotFound）
    pub fn batch_dir(&self, batch: &str) -> Result<PathBuf> {
        let dir = safe_join(&self.root, batch)?;
        if !dir.is_dir() {
            return Err(LogoBatchError::BatchNotFound(batch.to_string()));
        }
        Ok(dir)
    }

    pub fn create_batch(&self, batch: &str) -> Result<PathBuf> {
        let dir = safe_join(&self.root, batch)?;
        std::fs::create_dir_all(&dir)?;
        tracing::info!(batch, "バッチフォルダを作成");
        Ok(dir)
    }

    /// バッチ内のブランド一覧
    pub fn list(&self, batch: &str) -> Result<Vec<BrandGroup>> {
        let dir = self.batch_dir(batch)?;
        let names = file_names(&scanner::scan_folder(&dir)?);
        Ok(BrandSidecar::load(&dir).group(&names))
    }

    /// 全バッチのブランド一覧（バッチ名順）
    pub fn list_all(&self) -> Result<Vec<(String, Vec<BrandGroup>)>> {
        let batches = self.batches()?;
        batches
            .into_par_iter()
            .map(|batch| {
                let groups = self.list(&batch)?;
                Ok((batch, groups))
            })
            .collect()
    }

    /// ブランドを探す
    ///
    /// 表示名で探し、同じ表示名のグループが複数あるときは
    /// ブランドキー（`Air_Canada` など）と完全一致するものに絞る。
    fn find_group(
        &self,
        dir: &Path,
        brand: &str,
    ) -> Result<(Vec<String>, BrandSidecar, BrandGroup)> {
        let names = file_names(&scanner::scan_folder(dir)?);
        let sidecar = BrandSidecar::load(dir);
        let brand = brand.trim();
        let wanted = display_name(brand);

        let mut candidates: Vec<BrandGroup> = sidecar
            .group(&names)
            .into_iter()
            .filter(|g| g.brand == wanted)
            .collect();

        if candidates.len() > 1 {
            candidates.retain(|g| {
                g.files
                    .first()
                    .map(|f| sidecar.resolve(f) == brand)
                    .unwrap_or(false)
            });
            if candidates.len() != 1 {
                return Err(LogoBatchError::AmbiguousBrand(brand.to_string()));
            }
        }

        let group = candidates
            .pop()
            .ok_or_else(|| LogoBatchError::BrandNotFound(brand.to_string()))?;
        Ok((names, sidecar, group))
    }

    /// ロゴを追加
    ///
    /// 保存名は `{ブランドキー}_logo{n}.{拡張子}`（n は未使用の最小番号）。
    ///
    /// # Returns
    /// 保存したファイル名
    pub fn add_logo(&self, batch: &str, brand: &str, source: &Path) -> Result<String> {
        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !allowed_extension(&source_name) {
            return Err(LogoBatchError::UnsupportedExtension(source_name));
        }
        if !source.is_file() {
            return Err(LogoBatchError::FileNotFound(source.display().to_string()));
        }

        let key = clean_brand_key(brand);
        if key.is_empty() {
            return Err(logo_batch_common::Error::InvalidArgument(format!(
                "ブランド名が空です: {:?}",
                brand
            ))
            .into());
        }

        let dir = self.create_batch(batch)?;
        let names = file_names(&scanner::scan_folder(&dir)?);
        let ext = extension_of(&source_name).unwrap_or("png").to_lowercase();

        let slot = next_free_slot(&key, &names);
        let file_name = logo_file_name(&key, slot, &ext);
        std::fs::copy(source, dir.join(&file_name))?;

        let mut sidecar = BrandSidecar::load(&dir);
        sidecar.assign(file_name.as_str(), key.as_str());
        sidecar.save(&dir)?;

        tracing::info!(batch, brand = %key, file = %file_name, "ロゴを追加");
        Ok(file_name)
    }

    /// ブランド名を変更（グループ内の全ファイルを改名）
    ///
    /// 改名先が1つでも既存ファイルと衝突する場合は何も変更しない。
    pub fn rename_brand(
        &self,
        batch: &str,
        brand: &str,
        new_name: &str,
    ) -> Result<RenameOutcome> {
        let dir = self.batch_dir(batch)?;
        let (names, mut sidecar, group) = self.find_group(&dir, brand)?;

        let new_key = clean_brand_key(new_name);
        if new_key.is_empty() {
            return Err(logo_batch_common::Error::InvalidArgument(format!(
                "新しいブランド名が空です: {:?}",
                new_name
            ))
            .into());
        }

        // 改名先を先に決めて衝突を確認
        let mut taken: Vec<String> = names
            .iter()
            .filter(|n| !group.files.contains(n))
            .cloned()
            .collect();
        let mut plan = Vec::new();
        for file in &group.files {
            let old_key = sidecar.resolve(file);
            let target = match file.strip_prefix(old_key.as_str()) {
                Some(rest) if !old_key.is_empty() => format!("{}{}", new_key, rest),
                _ => {
                    let ext = extension_of(file).unwrap_or("png");
                    logo_file_name(&new_key, next_free_slot(&new_key, &taken), ext)
                }
            };
            let on_disk = !group.files.contains(&target) && dir.join(&target).exists();
            if taken.contains(&target) || on_disk {
                return Err(LogoBatchError::AlreadyExists(target));
            }
            taken.push(target.clone());
            plan.push((file.clone(), target));
        }

        move_files(&dir, &plan)?;
        for (old, _) in &plan {
            sidecar.remove(old);
        }
        for (_, new) in &plan {
            sidecar.assign(new.as_str(), new_key.as_str());
        }
        sidecar.save(&dir)?;

        tracing::info!(
            batch,
            from = %group.brand,
            to = %new_key,
            files = plan.len(),
            "ブランド名を変更"
        );
        Ok(RenameOutcome { renamed: plan })
    }

    /// ブランドのロゴを全て削除
    ///
    /// # Returns
    /// 削除したファイル名
    pub fn delete_brand(&self, batch: &str, brand: &str) -> Result<Vec<String>> {
        let dir = self.batch_dir(batch)?;
        let (_, mut sidecar, group) = self.find_group(&dir, brand)?;

        for file in &group.files {
            std::fs::remove_file(dir.join(file))?;
            sidecar.remove(file);
        }
        sidecar.save(&dir)?;

        tracing::info!(batch, brand = %group.brand, files = group.files.len(), "ブランドを削除");
        Ok(group.files)
    }

    /// ロゴを1件削除
    pub fn delete_logo(&self, batch: &str, file_name: &str) -> Result<()> {
        let dir = self.batch_dir(batch)?;
        let path = safe_join(&dir, file_name)?;
        if !path.is_file() {
            return Err(LogoBatchError::FileNotFound(file_name.to_string()));
        }

        std::fs::remove_file(&path)?;
        let mut sidecar = BrandSidecar::load(&dir);
        if sidecar.remove(file_name).is_some() {
            sidecar.save(&dir)?;
        }

        tracing::info!(batch, file = %file_name, "ロゴを削除");
        Ok(())
    }

    /// 推定ブランドを割り当てファイルに書き出す
    ///
    /// # Returns
    /// (追加件数, 削除した古い記録の件数)
    pub fn migrate(&self, batch: &str) -> Result<(usize, usize)> {
        let dir = self.batch_dir(batch)?;
        let names = file_names(&scanner::scan_folder(&dir)?);

        let mut sidecar = BrandSidecar::load(&dir);
        let pruned = sidecar.prune(&names);
        let added = sidecar.migrate(&names);
        sidecar.save(&dir)?;

        Ok((added, pruned))
    }
}

/// 一時名を経由して改名（グループ内で旧名と新名が重なっても上書きしない）
///
/// 一時名への移動に失敗した場合は移動済みのファイルを元に戻す。
fn move_files(dir: &Path, plan: &[(String, String)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &str, &str)> = Vec::with_capacity(plan.len());

    for (i, (old, new)) in plan.iter().enumerate() {
        if old == new {
            continue;
        }
        let temp = dir.join(format!(".{}.{}.renaming", i, old));
        if let Err(e) = std::fs::rename(dir.join(old), &temp) {
            for (temp, old, _) in &staged {
                if let Err(undo) = std::fs::rename(temp, dir.join(old)) {
                    tracing::error!(file = %old, error = %undo, "改名の取り消しに失敗");
                }
            }
            return Err(e.into());
        }
        staged.push((temp, old.as_str(), new.as_str()));
    }

    for (temp, _, new) in &staged {
        std::fs::rename(temp, dir.join(new))?;
    }
    Ok(())
}

/// `{key}_logo{n}` が未使用の最小の n（1始まり）
fn next_free_slot<S: AsRef<str>>(key: &str, existing: &[S]) -> usize {
    (1..)
        .find(|n| {
            let stem = format!("{}_logo{}", key, n);
            !existing.iter().any(|f| file_stem(f.as_ref()) == stem)
        })
        .unwrap_or(1)
}
