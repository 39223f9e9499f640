//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 呼び出し側の契約違反（必須列の欠落など）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
