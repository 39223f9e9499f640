//! ロゴ画像のダウンロード
//!
//! - Wikipediaのファイルページは実画像（upload.wikimedia.org）のURLに解決する
//! - 小さすぎるレスポンス（既定100バイト未満）は保存しない

use crate::config::Config;
use crate::error::{LogoBatchError, Result};
use logo_batch_common::naming::{extension_from_url_path, DEFAULT_EXTENSION};
use regex::Regex;
use std::path::Path;
use std::time::Duration;

/// ロゴ画像の取得
#[allow(async_fn_in_trait)]
pub trait LogoFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwestによる取得
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LogoBatchError::Download(format!("HTTPクライアント生成エラー: {}", e)))?;
        Ok(Self { client })
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LogoBatchError::Download(describe_error(&e)))?
            .error_for_status()
            .map_err(|e| LogoBatchError::Download(describe_error(&e)))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LogoBatchError::Download(describe_error(&e)))?;
        Ok(bytes.to_vec())
    }
}

impl LogoFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if !url.starts_with("http") {
            return Err(LogoBatchError::Download(format!("URLではありません: {}", url)));
        }

        let target = if is_wikipedia_file_page(url) {
            tracing::debug!(url, "Wikipediaページから画像リンクを探します");
            let page = self.get_bytes(url).await?;
            let html = String::from_utf8_lossy(&page);
            wikimedia_image_url(&html).ok_or_else(|| {
                LogoBatchError::Download("Wikipediaページから画像を取得できません".into())
            })?
        } else {
            url.to_string()
        };

        self.get_bytes(&target).await
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "タイムアウト".to_string()
    } else {
        e.to_string()
    }
}

pub fn is_wikipedia_file_page(url: &str) -> bool {
    url.contains("wikipedia.org/wiki/File:") || url.contains("wikipedia.org/wiki/Image:")
}

/// ファイルページのHTMLから原寸画像のURLを取り出す
pub fn wikimedia_image_url(html: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref UPLOAD_RE: Regex =
            Regex::new(r#"href="(//upload\.wikimedia\.org/wikipedia/[^"]+)""#).unwrap();
    }

    UPLOAD_RE
        .captures(html)
        .map(|cap| format!("https:{}", &cap[1]))
}

/// URLから保存用の拡張子を決める（ドット付き）
pub fn extension_for_url(url: &str) -> &'static str {
    let path = reqwest::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();
    let decoded = match urlencoding::decode(&path) {
        Ok(p) => p.into_owned(),
        Err(_) => path.clone(),
    };
    extension_from_url_path(url, &decoded)
}

/// URLで判別できなかったとき、中身から拡張子を推定
pub fn refine_extension(url_ext: &'static str, bytes: &[u8]) -> &'static str {
    if url_ext != DEFAULT_EXTENSION {
        return url_ext;
    }
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => ".jpg",
        Ok(image::ImageFormat::Gif) => ".gif",
        Ok(image::ImageFormat::WebP) => ".webp",
        _ => url_ext,
    }
}

/// 取得した画像を保存（min_bytes 未満なら保存しない）
///
/// # Returns
/// 保存したら true
pub fn save_logo(bytes: &[u8], path: &Path, min_bytes: u64) -> Result<bool> {
    if (bytes.len() as u64) < min_bytes {
        tracing::debug!(path = %path.display(), size = bytes.len(), "小さすぎるため破棄");
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        return Ok(false);
    }
    std::fs::write(path, bytes)?;
    Ok(true)
}
