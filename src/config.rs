use crate::error::{LogoBatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// バッチフォルダを置くルート（`<root>/<batch>/*.png`）
    pub logos_root: PathBuf,
    /// 参照シート（Brand, Logo1-3）
    pub reference_file: PathBuf,
    pub timeout_seconds: u64,
    /// これより小さいダウンロードは破棄
    pub min_image_bytes: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logos_root: PathBuf::from("static").join("logos"),
            reference_file: PathBuf::from("client_logo_master.xlsx"),
            timeout_seconds: 10,
            min_image_bytes: 100,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "設定を読み込みました");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LogoBatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("logo-batch").join("config.json"))
    }

    /// 環境変数 `LOGO_BATCH_ROOT` があればルートを上書き
    pub fn logos_root(&self) -> PathBuf {
        std::env::var_os("LOGO_BATCH_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.logos_root.clone())
    }

    pub fn set_logos_root(&mut self, root: PathBuf) -> Result<()> {
        self.logos_root = root;
        self.save()
    }

    pub fn set_reference_file(&mut self, path: PathBuf) -> Result<()> {
        self.reference_file = path;
        self.save()
    }
}
