use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use concat_string::concat_string;
use tokio::sync::watch;

use crate::{
    quote::LogSink,
    util::{http, text},
};

/// 行情來源抓取介面，測試時可注入假實作。
#[async_trait]
pub trait QuoteFeed: Send + Sync {
    /// 抓取行情原文。所有重試手段用盡仍失敗時回傳 `None`，
    /// 由呼叫端決定是否改用模擬數據。
    async fn fetch(&self, request_path: &str) -> Option<String>;
}

/// 每次請求最多嘗試的次數（含第一次）。
const MAX_ATTEMPTS: usize = 3;

/// 兩次嘗試之間的固定等待時間。
/// 行情來源沒有定義退避規則，因此不採用指數退避。
const RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// 以 HTTP GET 向行情來源取得報價原文。
pub struct HttpFeed {
    base_url: String,
    log: Arc<dyn LogSink>,
    shutdown: watch::Receiver<bool>,
}

impl HttpFeed {
    pub fn new(base_url: String, log: Arc<dyn LogSink>, shutdown: watch::Receiver<bool>) -> Self {
        HttpFeed {
            base_url,
            log,
            shutdown,
        }
    }

    async fn try_fetch(&self, url: &str, attempt: usize) -> Result<Vec<u8>> {
        let response = http::get_client()?.get(url).send().await?;
        let status = response.status();

        self.log
            .append(format!("行情回應：第 {} 次嘗試，狀態碼 {}", attempt, status));

        if !status.is_success() {
            return Err(anyhow!("unexpected response status {}", status));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// 重試前的等待，收到關閉通知時立即中止並回傳 false。
    async fn wait_for_retry(&self) -> bool {
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            _ = tokio::time::sleep(RETRY_INTERVAL) => true,
            _ = shutdown.changed() => {
                self.log.append("行情請求：收到關閉通知，中止重試".to_string());
                false
            }
        }
    }

    /// 將回應內容由 GBK 解碼成 UTF-8，失敗時改以 UTF-8 解讀，
    /// 兩者皆失敗視為本次抓取失敗。
    fn decode_body(&self, body: &[u8]) -> Option<String> {
        match text::gbk_2_utf8(body) {
            Ok(decoded) => {
                self.log.append(format!(
                    "行情回應：使用 GBK 解碼成功，共 {} 個字元",
                    decoded.chars().count()
                ));
                Some(decoded)
            }
            Err(why) => {
                self.log.append(format!(
                    "行情回應：GBK 解碼失敗，改用 UTF-8：{:?}",
                    why
                ));

                match text::utf8(body) {
                    Ok(decoded) => {
                        self.log.append(format!(
                            "行情回應：使用 UTF-8 解碼成功，共 {} 個字元",
                            decoded.chars().count()
                        ));
                        Some(decoded)
                    }
                    Err(why) => {
                        self.log.append(format!(
                            "行情回應：UTF-8 解碼仍失敗，放棄本次內容：{:?}",
                            why
                        ));
                        None
                    }
                }
            }
        }
    }
}

#[async_trait]
impl QuoteFeed for HttpFeed {
    async fn fetch(&self, request_path: &str) -> Option<String> {
        let url = concat_string!(self.base_url, request_path);

        for attempt in 1..=MAX_ATTEMPTS {
            self.log
                .append(format!("Attempt {} to GET {}", attempt, url));

            match self.try_fetch(&url, attempt).await {
                Ok(body) => return self.decode_body(&body),
                Err(why) => {
                    self.log.append(format!(
                        "Attempt {} to GET {} failed because {:?}",
                        attempt, url, why
                    ));

                    if attempt < MAX_ATTEMPTS && !self.wait_for_retry().await {
                        return None;
                    }
                }
            }
        }

        self.log.append(format!(
            "行情請求：{} 次嘗試均失敗，放棄本次請求",
            MAX_ATTEMPTS
        ));
        None
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::quote::tests::MemorySink;

    fn feed_with_sink(base_url: &str) -> (HttpFeed, Arc<MemorySink>, watch::Sender<bool>) {
        let sink = Arc::new(MemorySink::default());
        let (tx, rx) = watch::channel(false);
        let feed = HttpFeed::new(base_url.to_string(), sink.clone(), rx);
        (feed, sink, tx)
    }

    #[tokio::test]
    async fn test_fetch_returns_none_when_unreachable() {
        // 本機未監聽的埠，連線立即被拒絕
        let (feed, sink, _tx) = feed_with_sink("http://127.0.0.1:9");
        let result = feed.fetch("/list=sh600000").await;

        assert!(result.is_none());
        assert!(sink
            .lines()
            .iter()
            .any(|line| line.contains("Attempt 3")));
    }

    #[tokio::test]
    async fn test_fetch_aborts_retry_wait_on_shutdown() {
        let (feed, sink, tx) = feed_with_sink("http://127.0.0.1:9");
        let _ = tx.send(true);

        let start = Instant::now();
        let result = feed.fetch("/list=sh600000").await;

        assert!(result.is_none());
        // 第一次失敗後的等待應立即被關閉通知打斷，不會撐滿兩段 500ms
        assert!(start.elapsed() < RETRY_INTERVAL * 2);
        assert!(sink
            .lines()
            .iter()
            .any(|line| line.contains("中止重試")));
    }

    #[tokio::test]
    async fn test_decode_body_gbk_then_utf8() {
        let (feed, _sink, _tx) = feed_with_sink("http://127.0.0.1:9");

        let (gbk_bytes, _, _) = encoding_rs::GBK.encode("浦发银行");
        assert_eq!(feed.decode_body(gbk_bytes.as_ref()).unwrap(), "浦发银行");

        assert!(feed.decode_body(&[0xff, 0xff, 0xff]).is_none());
    }

    #[tokio::test]
    async fn test_decode_body_falls_back_to_utf8() {
        let (feed, sink, _tx) = feed_with_sink("http://127.0.0.1:9");

        // 單一 CJK 字的 UTF-8 序列是 3 個位元組，以 GBK 解讀時
        // 最後一個位元組落單而解碼失敗，應改走 UTF-8 成功
        let body = "中".as_bytes();
        assert_eq!(feed.decode_body(body).unwrap(), "中");

        let lines = sink.lines();
        assert!(lines.iter().any(|line| line.contains("GBK 解碼失敗")));
        assert!(lines
            .iter()
            .any(|line| line.contains("使用 UTF-8 解碼成功")));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_live() {
        dotenv::dotenv().ok();
        let (feed, sink, _tx) = feed_with_sink("https://hq.sinajs.cn");

        let text = feed.fetch("/list=sh600000").await;
        dbg!(&text);
        for line in sink.lines() {
            println!("{}", line);
        }
    }
}
