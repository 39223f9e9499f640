//! 参照シートの列対応
//!
//! `Brand`, `Logo1`, `Logo2`, `Logo3` 列を持つ表をReferenceBrandRowに変換する。
//! Excel/CSVの読み込み自体は呼び出し側で行い、ここではセル文字列だけを扱う。

use crate::error::{Error, Result};
use crate::types::{ReferenceBrandRow, LOGO_SLOTS};

pub const BRAND_COLUMN: &str = "Brand";

/// ヘッダー名 → 列番号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    brand: usize,
    logos: [Option<usize>; LOGO_SLOTS],
}

impl ColumnMap {
    /// ヘッダー行から列位置を決定（ヘッダー名は前後の空白を無視）
    ///
    /// `Brand` 列がなければ `InvalidArgument`。
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);

        let brand = position(BRAND_COLUMN).ok_or_else(|| {
            Error::InvalidArgument(format!("missing `{}` column", BRAND_COLUMN))
        })?;

        let mut logos = [None; LOGO_SLOTS];
        for (i, slot) in logos.iter_mut().enumerate() {
            *slot = position(format!("Logo{}", i + 1).as_str());
        }

        Ok(Self { brand, logos })
    }

    /// データ行を変換（Brandが空の行は None）
    pub fn row_from_cells<S: AsRef<str>>(&self, cells: &[S]) -> Option<ReferenceBrandRow> {
        let cell = |idx: usize| cells.get(idx).and_then(|c| normalize_cell(c.as_ref()));

        let name = cell(self.brand)?;
        let mut row = ReferenceBrandRow::new(name);
        for (i, column) in self.logos.iter().enumerate() {
            row.logos[i] = column.and_then(|idx| cell(idx));
        }
        Some(row)
    }

    /// 全データ行を変換
    pub fn rows_from_records<R, S>(&self, records: R) -> Vec<ReferenceBrandRow>
    where
        R: IntoIterator,
        R::Item: AsRef<[S]>,
        S: AsRef<str>,
    {
        records
            .into_iter()
            .filter_map(|record| self.row_from_cells(record.as_ref()))
            .collect()
    }
}

/// セル文字列を正規化（空白のみ・`nan` は値なし）
pub fn normalize_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
