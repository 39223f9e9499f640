use clap::Parser;
use logo_batch::{batch, cli, config, downloader, error, export, library, reference};
use batch::{BatchOptions, BatchReport};
use cli::{Cli, Commands, ListFormat};
use config::Config;
use error::{LogoBatchError, Result};
use library::LogoLibrary;
use logo_batch_common::{match_all, BrandGroup, MatchKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let root = cli.root.clone().unwrap_or_else(|| config.logos_root());
    let library = LogoLibrary::new(root);

    match cli.command {
        Commands::Batches => {
            println!("📁 logo-batch - バッチ一覧 ({})\n", library.root().display());
            for (batch, groups) in library.list_all()? {
                let files: usize = groups.iter().map(|g| g.files.len()).sum();
                println!("  {:<12} {}ブランド / {}ファイル", batch, groups.len(), files);
            }
        }

        Commands::List { batch, format, output } => match batch {
            Some(batch) => {
                let groups = library.list(&batch)?;
                export::export_groups(&batch, &groups, &format, output.as_deref())?;
            }
            None => list_all_batches(&library, &format, output.as_deref())?,
        },

        Commands::Match { brands, brand, reference } => {
            println!("🔍 logo-batch - ブランド照合\n");

            let mut queries = match brands {
                Some(path) => batch::load_brand_list(&path)?,
                None => Vec::new(),
            };
            queries.extend(brand.iter().map(|b| b.trim().to_string()).filter(|b| !b.is_empty()));
            if queries.is_empty() {
                return Err(LogoBatchError::Config(
                    "ブランド一覧ファイルか --brand を指定してください".into(),
                ));
            }

            let reference_path = reference.unwrap_or_else(|| config.reference_file.clone());
            let rows = reference::load_reference(&reference_path)?;
            println!("✔ 参照シート: {}件\n", rows.len());

            let results = match_all(&queries, &rows);
            for (query, result) in queries.iter().zip(&results) {
                match (result.kind, result.matched_name) {
                    (MatchKind::Exact, Some(_)) => println!("✔ {}", query),
                    (kind, Some(name)) => println!("🔗 {} → {} [{}]", query, name, kind),
                    (kind, None) => println!("❌ {} [{}]", query, kind),
                }
            }
            let found = results.iter().filter(|r| r.kind.is_found()).count();
            println!("\n{}/{} 件が見つかりました", found, queries.len());
        }

        Commands::Download { batch, brands, plan, reference, output, name_source, no_report } => {
            println!("⬇ logo-batch - ロゴ一括ダウンロード\n");

            let plan = match (plan, batch) {
                (Some(path), _) => batch::load_batch_plan(&path)?,
                (None, Some(id)) => {
                    let path = brands.ok_or_else(|| {
                        LogoBatchError::Config(
                            "--brands でブランド一覧ファイルを指定してください".into(),
                        )
                    })?;
                    BTreeMap::from([(id, batch::load_brand_list(&path)?)])
                }
                (None, None) => {
                    return Err(LogoBatchError::Config(
                        "バッチ名か --plan を指定してください".into(),
                    ))
                }
            };

            let reference_path = reference.unwrap_or_else(|| config.reference_file.clone());
            println!("[1/2] 参照シートを読み込み中...");
            let rows = reference::load_reference(&reference_path)?;
            println!("✔ {}件のブランドを読み込み\n", rows.len());

            let fetcher = downloader::HttpFetcher::new(&config)?;
            let into_library = output.is_none();
            let base_dir = output.unwrap_or_else(|| library.root().to_path_buf());

            println!("[2/2] ダウンロード中...");
            for (batch_id, brands) in &plan {
                println!("\n=== Batch {} ({}ブランド) ===", batch_id, brands.len());
                let options = BatchOptions {
                    output_dir: library::safe_join(&base_dir, batch_id)?,
                    min_image_bytes: config.min_image_bytes,
                    name_source,
                    progress: !cli.verbose,
                };

                let report = batch::run_batch(batch_id, brands, &rows, &fetcher, &options).await?;
                print_summary(&report);

                if into_library {
                    let (added, _) = library.migrate(batch_id)?;
                    tracing::debug!(batch = %batch_id, added, "ブランド情報を更新");
                }

                if !no_report {
                    let name = export::excel::report_file_name(batch_id, chrono::Local::now());
                    let report_path = base_dir.join(name);
                    export::excel::write_report(&report.records, &report_path)?;
                    println!("📊 レポート: {}", report_path.display());
                }
            }

            println!("\n✅ ダウンロード完了");
        }

        Commands::Add { batch, brand, file } => {
            let saved = library.add_logo(&batch, &brand, &file)?;
            println!("✔ 追加しました: {}/{}", batch, saved);
        }

        Commands::Rename { batch, brand, new_name } => {
            let outcome = library.rename_brand(&batch, &brand, &new_name)?;
            for (old, new) in &outcome.renamed {
                println!("  {} → {}", old, new);
            }
            println!("✔ {}件のファイルを改名しました", outcome.renamed.len());
        }

        Commands::Delete { batch, brand, file, yes } => {
            let target = match (&file, &brand) {
                (Some(file), _) => file.clone(),
                (None, Some(brand)) => brand.clone(),
                (None, None) => {
                    return Err(LogoBatchError::Config(
                        "ブランド名か --file を指定してください".into(),
                    ))
                }
            };

            if !yes && !confirm(&format!("{}/{} を削除しますか？", batch, target))? {
                println!("中止しました");
                return Ok(());
            }

            if file.is_some() {
                library.delete_logo(&batch, &target)?;
                println!("✔ 削除しました: {}", target);
            } else {
                let removed = library.delete_brand(&batch, &target)?;
                for name in &removed {
                    println!("  🗑 {}", name);
                }
                println!("✔ {}件のファイルを削除しました", removed.len());
            }
        }

        Commands::Migrate { batch } => {
            let batches = match batch {
                Some(batch) => vec![batch],
                None => library.batches()?,
            };
            for batch in &batches {
                let (added, pruned) = library.migrate(batch)?;
                println!("✔ {}: {}件追加 / {}件削除", batch, added, pruned);
            }
        }

        Commands::Gallery { batch, output } => {
            let groups = library.list(&batch)?;
            export::export_groups(&batch, &groups, &ListFormat::Excel, output.as_deref())?;
        }

        Commands::Config { set_root, set_reference, show } => {
            let mut config = config;

            if let Some(root) = set_root {
                config.set_logos_root(root)?;
                println!("✔ ロゴ保存ルートを設定しました");
            }

            if let Some(path) = set_reference {
                config.set_reference_file(path)?;
                println!("✔ 参照シートを設定しました");
            }

            if show {
                println!("設定 ({}):", Config::config_path()?.display());
                println!("  ロゴ保存ルート: {}", config.logos_root().display());
                println!("  参照シート: {}", config.reference_file.display());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  最小画像サイズ: {} bytes", config.min_image_bytes);
            }
        }
    }

    Ok(())
}

fn list_all_batches(
    library: &LogoLibrary,
    format: &ListFormat,
    output: Option<&Path>,
) -> Result<()> {
    let all = library.list_all()?;

    match format {
        ListFormat::Table => {
            for (batch, groups) in &all {
                println!("=== {} ===", batch);
                export::write_table(&mut std::io::stdout().lock(), groups)?;
                println!();
            }
        }
        ListFormat::Json => {
            let map: BTreeMap<&str, &Vec<BrandGroup>> =
                all.iter().map(|(batch, groups)| (batch.as_str(), groups)).collect();
            let json = serde_json::to_string_pretty(&map)?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        ListFormat::Excel => {
            let dir = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
            for (batch, groups) in &all {
                export::export_groups(batch, groups, format, Some(&dir))?;
            }
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| LogoBatchError::Config(e.to_string()))
}

fn print_summary(report: &BatchReport) {
    let s = &report.summary;
    println!("\n--- Batch {} 結果 ---", report.batch_id);
    println!("  ブランド: {}", s.total);
    println!("  見つかった: {}", s.found);
    println!("  見つからない: {}", s.not_found);
    println!("  画像: {}", s.images);
    println!("  失敗: {}", s.failed);
    for (i, count) in s.per_slot.iter().enumerate() {
        println!("  Logo{}: {}", i + 1, count);
    }

    let missing: Vec<&str> = report
        .records
        .iter()
        .filter(|r| r.match_kind == MatchKind::NotFound.to_string())
        .map(|r| r.brand.as_str())
        .collect();
    if !missing.is_empty() {
        println!("\n  参照シートにないブランド:");
        for brand in missing {
            println!("    - {}", brand);
        }
    }
}
