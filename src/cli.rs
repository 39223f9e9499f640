use crate::batch::NameSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logo-batch")]
#[command(about = "ブランドロゴのバッチ管理・一括ダウンロードツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ロゴ保存ルート（設定ファイルより優先）
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// バッチ一覧を表示
    Batches,

    /// バッチ内のロゴをブランドごとに表示
    List {
        /// バッチ名（省略時は全バッチ）
        batch: Option<String>,

        /// 出力形式 (table/json/excel)
        #[arg(short, long, default_value = "table")]
        format: ListFormat,

        /// 出力ファイル
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// ブランド名を参照シートと照合
    Match {
        /// ブランド一覧ファイル（1行1ブランド）
        brands: Option<PathBuf>,

        /// ブランド名を直接指定（複数可）
        #[arg(short, long)]
        brand: Vec<String>,

        /// 参照シート（xlsx/csv）
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },

    /// 参照シートのURLからロゴを一括ダウンロード
    Download {
        /// バッチ名
        #[arg(required_unless_present = "plan")]
        batch: Option<String>,

        /// ブランド一覧ファイル（1行1ブランド）
        #[arg(short, long, conflicts_with = "plan")]
        brands: Option<PathBuf>,

        /// 複数バッチ定義JSON（{"54a": [...], ...}）
        #[arg(long)]
        plan: Option<PathBuf>,

        /// 参照シート（xlsx/csv）
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// 保存先ディレクトリ（省略時は ルート/バッチ名）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ファイル名に使う名前 (matched/query)
        #[arg(long, default_value = "matched")]
        name_source: NameSource,

        /// レポートを出力しない
        #[arg(long)]
        no_report: bool,
    },

    /// ロゴを追加
    Add {
        /// バッチ名
        batch: String,

        /// ブランド名
        brand: String,

        /// 画像ファイル
        file: PathBuf,
    },

    /// ブランド名を変更
    Rename {
        /// バッチ名
        batch: String,

        /// 現在のブランド名（表示名）
        brand: String,

        /// 新しいブランド名
        new_name: String,
    },

    /// ブランドまたは単一ファイルを削除
    Delete {
        /// バッチ名
        batch: String,

        /// ブランド名（表示名）
        #[arg(required_unless_present = "file")]
        brand: Option<String>,

        /// ファイル名を指定して1件だけ削除
        #[arg(long, conflicts_with = "brand")]
        file: Option<String>,

        /// 確認しない
        #[arg(short, long)]
        yes: bool,
    },

    /// ファイル名からブランド情報（.brands.json）を作成
    Migrate {
        /// バッチ名（省略時は全バッチ）
        batch: Option<String>,
    },

    /// バッチのロゴ一覧Excelを生成
    Gallery {
        /// バッチ名
        batch: String,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// ロゴ保存ルートを設定
        #[arg(long)]
        set_root: Option<PathBuf>,

        /// 参照シートを設定
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
    Excel,
}

impl std::str::FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(ListFormat::Table),
            "json" => Ok(ListFormat::Json),
            "excel" | "xlsx" => Ok(ListFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use table, json, or excel", s)),
        }
    }
}
