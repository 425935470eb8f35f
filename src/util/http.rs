use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use reqwest::{header, Client};

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

/// 模擬瀏覽器的 User-Agent，缺少時部分行情站會回應空白內容。
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 行情來源檢查的 Referer，同樣不可省略。
const REFERER: &str = "https://finance.sina.com.cn/";

/// 單一請求的逾時時間。
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
pub fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // reqwest 以 rustls-no-provider 編譯，須先註冊 CryptoProvider 才能建立連線
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            .brotli(true)
            .gzip(true)
            .zstd(true)
            .timeout(REQUEST_TIMEOUT)
            .tcp_nodelay(true)
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

fn default_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("text/plain"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("zh-CN,zh;q=0.9"),
    );
    headers.insert(header::REFERER, header::HeaderValue::from_static(REFERER));
    headers
}
