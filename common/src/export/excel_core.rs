//! Excel生成（共通ライブラリ）
//!
//! - ダウンロードレポート（照合結果とロゴの保存先/URL）
//! - ブランド一覧シート（ブランドごとのロゴファイル名。画像は埋め込まない）

use crate::types::{BrandGroup, DownloadRecord, LOGO_SLOTS};
use rust_xlsxwriter::*;

pub const REPORT_SHEET_NAME: &str = "Download Report";

/// レポートのヘッダー
pub const REPORT_HEADERS: [&str; 9] = [
    "Brand",
    "Matched_As",
    "Match_Type",
    "Logo1_Path",
    "Logo2_Path",
    "Logo3_Path",
    "Logo1_URL",
    "Logo2_URL",
    "Logo3_URL",
];

/// 自動列幅の上限
const MAX_COLUMN_WIDTH: usize = 60;

/// ブランド一覧の列幅（Brand, Logo 1-3）
const GALLERY_COLUMN_WIDTHS: [f64; 4] = [25.0, 30.0, 30.0, 30.0];

/// シート名の最大長（Excelの制限）
const MAX_SHEET_NAME_CHARS: usize = 31;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA))
}

fn report_cells(record: &DownloadRecord) -> Vec<&str> {
    let mut cells = vec![
        record.brand.as_str(),
        record.matched_as.as_str(),
        record.match_kind.as_str(),
    ];
    cells.extend(record.logo_paths.iter().map(|s| s.as_str()));
    cells.extend(record.logo_urls.iter().map(|s| s.as_str()));
    cells
}

/// 列幅 = min(最長文字数 + 2, 60)
fn column_widths(rows: &[Vec<&str>]) -> Vec<usize> {
    let mut widths: Vec<usize> = REPORT_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if len > widths[i] {
                widths[i] = len;
            }
        }
    }
    widths
        .into_iter()
        .map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
        .collect()
}

/// ダウンロードレポートをバッファに生成
pub fn generate_report_buffer(records: &[DownloadRecord]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(REPORT_SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    let bold = header_format();
    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    let rows: Vec<Vec<&str>> = records.iter().map(report_cells).collect();
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(i as u32 + 1, col as u16, *value)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    for (col, width) in column_widths(&rows).into_iter().enumerate() {
        worksheet
            .set_column_width(col as u16, width as f64)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// グループ内のファイルを Logo1〜Logo3 の枠に割り当てる
///
/// ファイル名に `logoN` を含むものはその枠へ、それ以外は空いている先頭の枠へ。
pub fn assign_logo_slots(group: &BrandGroup) -> [Option<&str>; LOGO_SLOTS] {
    place_logos(group).0
}

/// 3枠に入りきらなかったファイル
pub fn unplaced_files(group: &BrandGroup) -> Vec<&str> {
    place_logos(group).1
}

fn place_logos(group: &BrandGroup) -> ([Option<&str>; LOGO_SLOTS], Vec<&str>) {
    let mut slots: [Option<&str>; LOGO_SLOTS] = [None; LOGO_SLOTS];
    let mut unslotted = Vec::new();

    for file in &group.files {
        let lower = file.to_lowercase();
        let slot = (1..=LOGO_SLOTS).find(|n| lower.contains(&format!("logo{}", n)));
        match slot {
            Some(n) if slots[n - 1].is_none() => slots[n - 1] = Some(file.as_str()),
            _ => unslotted.push(file.as_str()),
        }
    }

    let mut overflow = Vec::new();
    for file in unslotted {
        match slots.iter_mut().find(|s| s.is_none()) {
            Some(free) => *free = Some(file),
            None => overflow.push(file),
        }
    }

    (slots, overflow)
}

/// Excelのシート名に使えない文字（`[]:*?/\`）を `_` に置換し、31文字に切り詰める
pub fn sheet_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let name = name.trim_matches('\'');
    if name.is_empty() {
        "Sheet1".to_string()
    } else {
        name.to_string()
    }
}

/// ブランド一覧シートをバッファに生成
///
/// # Arguments
/// * `title` - シート名（使えない文字は置換、31文字まで）
/// * `groups` - 表示順のブランドグループ
pub fn generate_gallery_buffer(title: &str, groups: &[BrandGroup]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name(title))
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, width) in GALLERY_COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    let bold = header_format();
    for (col, header) in ["Brand", "Logo 1", "Logo 2", "Logo 3"].iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    worksheet
        .set_row_height(0, 20)
        .map_err(|e| format!("行高さ設定エラー: {}", e))?;

    for (i, group) in groups.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet
            .write_string(row, 0, &group.brand)
            .map_err(|e| format!("ブランド書き込みエラー: {}", e))?;

        for (slot, file) in assign_logo_slots(group).iter().enumerate() {
            if let Some(file) = file {
                worksheet
                    .write_string(row, slot as u16 + 1, *file)
                    .map_err(|e| format!("ファイル名書き込みエラー: {}", e))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(brand: &str, files: &[&str]) -> BrandGroup {
        BrandGroup {
            brand: brand.to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_assign_logo_slots_by_marker() {
        let g = group("TD", &["TD_logo2.png", "TD_logo1.svg"]);
        let slots = assign_logo_slots(&g);
        assert_eq!(slots, [Some("TD_logo1.svg"), Some("TD_logo2.png"), None]);
    }

    #[test]
    fn test_assign_logo_slots_fills_free_slots() {
        let g = group("Telus", &["Telus_1.png", "Telus_logo1.png", "Telus_2.png", "Telus_3.png"]);
        let slots = assign_logo_slots(&g);
        assert_eq!(
            slots,
            [Some("Telus_logo1.png"), Some("Telus_1.png"), Some("Telus_2.png")]
        );
    }

    #[test]
    fn test_unplaced_files_beyond_three_slots() {
        let g = group("TD", &["TD_logo1.png", "TD_logo2.png", "TD_logo3.png", "TD_logo4.png"]);
        assert_eq!(
            assign_logo_slots(&g),
            [Some("TD_logo1.png"), Some("TD_logo2.png"), Some("TD_logo3.png")]
        );
        assert_eq!(unplaced_files(&g), vec!["TD_logo4.png"]);

        let small = group("TD", &["TD_logo1.png"]);
        assert!(unplaced_files(&small).is_empty());
    }

    #[test]
    fn test_sheet_name_replaces_invalid_chars() {
        assert_eq!(sheet_name("Batch 54[a]: Logos?"), "Batch 54_a__ Logos_");
        assert_eq!(sheet_name("a/b\\c*d"), "a_b_c_d");
        assert_eq!(sheet_name("'quoted'"), "quoted");
        assert_eq!(sheet_name(""), "Sheet1");
        assert_eq!(sheet_name(&"x".repeat(40)).chars().count(), 31);
    }

    #[test]
    fn test_generate_gallery_buffer_invalid_title() {
        let groups = vec![group("TD", &["TD_logo1.png"])];
        let buffer = generate_gallery_buffer("Batch [54a] Logos", &groups).unwrap();
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_column_widths_are_capped() {
        let long = "x".repeat(100);
        let rows = vec![vec!["TD", long.as_str(), "EXACT", "", "", "", "", "", ""]];
        let widths = column_widths(&rows);
        assert_eq!(widths[0], "Brand".len() + 2);
        assert_eq!(widths[1], 60);
        assert_eq!(widths[2], "Match_Type".len() + 2);
    }

    #[test]
    fn test_generate_report_buffer() {
        let records = vec![DownloadRecord::not_found("Gamesense")];
        let buffer = generate_report_buffer(&records).unwrap();
        // xlsxはzip形式
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_generate_gallery_buffer_long_title() {
        let groups = vec![group("TD", &["TD_logo1.png"])];
        let title = "Batch 54a Logos with a very long sheet title";
        let buffer = generate_gallery_buffer(title, &groups).unwrap();
        assert!(buffer.starts_with(b"PK"));
    }
}
