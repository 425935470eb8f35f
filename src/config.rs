use std::{env, path::PathBuf};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

/// 行情來源的預設端點（新浪財經）。
const DEFAULT_BASE_URL: &str = "https://hq.sinajs.cn";
/// 預設的輪詢間隔（秒）。
const DEFAULT_UPDATE_INTERVAL: u64 = 30;

const FEED_BASE_URL: &str = "FEED_BASE_URL";
const WATCH_STOCK_CODES: &str = "WATCH_STOCK_CODES";
const WATCH_UPDATE_INTERVAL: &str = "WATCH_UPDATE_INTERVAL";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub watch: Watch,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Feed {
    /// 行情來源端點，報價請求的路徑會接在此網址之後
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for Feed {
    fn default() -> Self {
        Feed {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Watch {
    /// 自選股代號清單
    #[serde(default)]
    pub stock_codes: Vec<String>,
    /// 定時更新間隔（秒）
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
}

impl Default for Watch {
    fn default() -> Self {
        Watch {
            stock_codes: Vec::new(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| {
    App::get().unwrap_or_else(|why| {
        logging::error_file_async(format!(
            "I can't read the config context because {:?}",
            why
        ));
        Default::default()
    })
});

impl App {
    fn get() -> Result<Self> {
        let config_path = PathBuf::from(CONFIG_PATH);
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env().normalized());
        }

        Ok(App::default().override_with_env().normalized())
    }

    /// 將來自 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(base_url) = env::var(FEED_BASE_URL) {
            self.feed.base_url = base_url;
        }

        if let Ok(codes) = env::var(WATCH_STOCK_CODES) {
            self.watch.stock_codes = split_codes(&codes);
        }

        if let Ok(interval) = env::var(WATCH_UPDATE_INTERVAL) {
            self.watch.update_interval = interval.parse().unwrap_or(DEFAULT_UPDATE_INTERVAL);
        }

        self
    }

    /// 整理使用者輸入的代號，除去空白外不做任何驗證
    fn normalized(mut self) -> Self {
        self.watch.stock_codes = self
            .watch
            .stock_codes
            .iter()
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();
        self
    }
}

/// 將逗號分隔的代號字串整理成清單。
pub fn split_codes(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
        .collect()
}
