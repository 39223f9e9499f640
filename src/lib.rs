//! logo-batch
//!
//! バッチフォルダ単位でブランドロゴを管理する。
//! 分類・照合の純粋な処理は `logo_batch_common` にあり、ここではファイル操作・
//! ダウンロード・Excel出力を行う。

pub mod batch;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod error;
pub mod export;
pub mod library;
pub mod reference;
pub mod scanner;
pub mod sidecar;
