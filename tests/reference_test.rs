//! 参照シート読み込みの統合テスト
//!
//! rust_xlsxwriter で作ったブックを calamine で読み戻す

use logo_batch::error::LogoBatchError;
use logo_batch::reference::load_reference;
use logo_batch_common::{find_best_match, MatchKind};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

fn write_reference(path: &Path, headers: &[&str], rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn test_load_xlsx_reference() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("client_logo_master.xlsx");
    write_reference(
        &path,
        &["Brand", "Logo1", "Logo2", "Logo3"],
        &[
            &["Air Canada", "https://cdn.test/ac.svg", "nan", ""],
            &["", "https://cdn.test/orphan.png", "", ""],
            &[
                "  Amalie Oil Co.  ",
                "https://cdn.test/amalie.png",
                "",
                "https://cdn.test/amalie3.png",
            ],
        ],
    );

    let rows = load_reference(&path).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].name, "Air Canada");
    assert_eq!(rows[0].name_lower, "air canada");
    assert_eq!(rows[0].logos[0].as_deref(), Some("https://cdn.test/ac.svg"));
    assert_eq!(rows[0].logos[1], None);

    assert_eq!(rows[1].name, "Amalie Oil Co.");
    assert_eq!(rows[1].logos[2].as_deref(), Some("https://cdn.test/amalie3.png"));
    let slots: Vec<usize> = rows[1].logo_urls().map(|(slot, _)| slot).collect();
    assert_eq!(slots, vec![1, 3]);
}

#[test]
fn test_xlsx_header_order_and_missing_logo_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("brands.xlsx");
    write_reference(
        &path,
        &["Logo1", "Notes", "Brand "],
        &[&["https://cdn.test/td.png", "bank", "TD"]],
    );

    let rows = load_reference(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "TD");
    assert_eq!(rows[0].logos[0].as_deref(), Some("https://cdn.test/td.png"));
    assert_eq!(rows[0].logos[1], None);
    assert_eq!(rows[0].logos[2], None);
}

#[test]
fn test_xlsx_without_brand_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("brands.xlsx");
    write_reference(&path, &["Name", "Logo1"], &[&["TD", "https://cdn.test/td.png"]]);

    assert!(matches!(
        load_reference(&path),
        Err(LogoBatchError::InvalidReference(_))
    ));
}

#[test]
fn test_match_against_loaded_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("brands.csv");
    std::fs::write(
        &path,
        concat!(
            "Brand,Logo1\n",
            "Amazon,https://cdn.test/amazon.png\n",
            "Amalie Oil Co.,https://cdn.test/amalie.png\n",
            "TD Bank,\n",
        ),
    )
    .unwrap();
    let rows = load_reference(&path).unwrap();

    let result = find_best_match("AMAZON", &rows);
    assert_eq!(result.kind, MatchKind::Exact);

    let result = find_best_match("Amazon.com Inc", &rows);
    assert_eq!(result.kind, MatchKind::Contains);
    assert_eq!(result.matched_name, Some("Amazon"));

    let result = find_best_match("td", &rows);
    assert_eq!(result.kind, MatchKind::Partial);
    assert_eq!(result.matched_name, Some("TD Bank"));

    let result = find_best_match("Amalie Oil Company", &rows);
    assert_eq!(result.kind, MatchKind::Fuzzy(2));
    assert_eq!(result.matched_name, Some("Amalie Oil Co."));

    let result = find_best_match("Telus", &rows);
    assert_eq!(result.kind, MatchKind::NotFound);
    assert!(result.row.is_none());
}
