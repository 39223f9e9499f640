use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogoBatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("バッチが見つかりません: {0}")]
    BatchNotFound(String),

    #[error("ブランドが見つかりません: {0}")]
    BrandNotFound(String),

    #[error("同じ表示名のブランドが複数あります: {0}（ブランドキーで指定してください）")]
    AmbiguousBrand(String),

    #[error("既に存在します: {0}")]
    AlreadyExists(String),

    #[error("対応していない拡張子です: {0}（png/jpg/jpeg/svg/webp/gif）")]
    UnsupportedExtension(String),

    #[error("不正なパスです: {0}")]
    PathEscape(String),

    #[error("参照シートが不正: {0}")]
    InvalidReference(String),

    #[error("ダウンロードエラー: {0}")]
    Download(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] logo_batch_common::Error),
}

pub type Result<T> = std::result::Result<T, LogoBatchError>;
