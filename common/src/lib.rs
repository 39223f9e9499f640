//! Logo Batch Common Library
//!
//! ロゴファイルのブランド分類と、参照シートとのブランド照合。
//! I/Oを行わない純粋な処理のみを置く。

pub mod types;
pub mod error;
pub mod grouper;
pub mod matcher;
pub mod naming;
pub mod reference;
pub mod export;

pub use types::{
    BrandGroup, DownloadRecord, LogoFile, MatchKind, MatchResult, ReferenceBrandRow, LOGO_SLOTS,
};
pub use error::{Error, Result};
pub use grouper::{classify, group_by_brand, group_by_brand_with, infer_brand_key};
pub use matcher::{find_best_match, match_all};
pub use naming::{allowed_extension, clean_brand_key, logo_file_name};
pub use reference::ColumnMap;
