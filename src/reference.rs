//! 参照シート（既知ブランド表）の読み込み
//!
//! Excel（xlsx/xls/ods、先頭シート）またはCSVから `Brand`, `Logo1`〜`Logo3` 列を読む。

use crate::error::{LogoBatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use logo_batch_common::reference::ColumnMap;
use logo_batch_common::ReferenceBrandRow;
use std::path::Path;

/// 拡張子に応じて参照シートを読み込む
pub fn load_reference(path: &Path) -> Result<Vec<ReferenceBrandRow>> {
    if !path.exists() {
        return Err(LogoBatchError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let rows = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path)?,
        other => {
            return Err(LogoBatchError::InvalidReference(format!(
                "対応していない形式です: .{} ({})",
                other,
                path.display()
            )))
        }
    };

    tracing::debug!(path = %path.display(), rows = rows.len(), "参照シートを読み込みました");
    Ok(rows)
}

fn column_map<S: AsRef<str>>(headers: &[S], path: &Path) -> Result<ColumnMap> {
    ColumnMap::from_headers(headers)
        .map_err(|e| LogoBatchError::InvalidReference(format!("{} ({})", e, path.display())))
}

fn load_csv(path: &Path) -> Result<Vec<ReferenceBrandRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LogoBatchError::InvalidReference(format!("CSVを開けません: {}", e)))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LogoBatchError::InvalidReference(format!("ヘッダー読み込みエラー: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let map = column_map(&headers, path)?;

    let mut records = Vec::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            LogoBatchError::InvalidReference(format!("CSV {}行目: {}", line_num + 2, e))
        })?;
        records.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    Ok(map.rows_from_records::<_, String>(records))
}

fn load_workbook(path: &Path) -> Result<Vec<ReferenceBrandRow>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LogoBatchError::InvalidReference(format!("Excelを開けません: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LogoBatchError::InvalidReference("シートがありません".into()))?
        .map_err(|e| LogoBatchError::InvalidReference(format!("シート読み込みエラー: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };
    let map = column_map(&headers, path)?;

    let records: Vec<Vec<String>> = rows
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    Ok(map.rows_from_records::<_, String>(records))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
