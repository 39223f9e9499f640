pub mod excel;

use crate::cli::ListFormat;
use crate::error::Result;
use logo_batch_common::BrandGroup;
use std::io::Write;
use std::path::Path;

/// ブランド一覧を表形式で書き出す
pub fn write_table<W: Write>(out: &mut W, groups: &[BrandGroup]) -> Result<()> {
    let width = groups
        .iter()
        .map(|g| g.brand.chars().count())
        .max()
        .unwrap_or(0);

    for group in groups {
        writeln!(
            out,
            "{:<width$}  ({}) {}",
            group.brand,
            group.files.len(),
            group.files.join(", "),
            width = width
        )?;
    }
    Ok(())
}

/// ブランド一覧を出力
///
/// * Table / Json は標準出力（`output` 指定時はファイル）
/// * Excel は `output`（省略時はカレント）に保存
pub fn export_groups(
    batch: &str,
    groups: &[BrandGroup],
    format: &ListFormat,
    output: Option<&Path>,
) -> Result<()> {
    match format {
        ListFormat::Table => match output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                write_table(&mut file, groups)?;
            }
            None => write_table(&mut std::io::stdout().lock(), groups)?,
        },
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(groups)?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        ListFormat::Excel => {
            let now = chrono::Local::now();
            let default_name = excel::gallery_file_name(batch, now);
            let output_path =
                excel::resolve_output(output.unwrap_or(Path::new(".")), &default_name);
            println!("- Excelを生成中...");
            excel::write_gallery(&format!("Batch {} Logos", batch), groups, &output_path)?;
            println!("✔ Excel出力: {}", output_path.display());
        }
    }

    Ok(())
}
