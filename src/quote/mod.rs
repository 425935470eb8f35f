use std::sync::Arc;

use concat_string::concat_string;
use tokio::sync::watch;

use crate::{
    config::SETTINGS,
    declare::Quote,
    logging,
    quote::fetch::{HttpFeed, QuoteFeed},
};

pub mod fetch;
pub mod mock;
pub mod parse;
pub mod symbol;

/// 報價管線的診斷訊息出口。
///
/// 投遞為盡力而為：實作端不可阻塞呼叫者，也不可讓投遞失敗外洩，
/// 時間戳由實作端在收下訊息時記錄。
pub trait LogSink: Send + Sync {
    fn append(&self, message: String);
}

/// 預設的診斷出口，轉送至非同步檔案日誌。
pub struct FileLogSink;

impl LogSink for FileLogSink {
    fn append(&self, message: String) {
        logging::info_file_async(message);
    }
}

/// 報價服務：代號轉換 → 抓取 → 解析 → 必要時改用模擬數據。
///
/// 對外的保證是永遠回傳一份可用的報價清單，僅在輸入為空時回傳空清單，
/// 任何內部失敗都不會以錯誤的形式離開此層。各次呼叫之間沒有共享的
/// 可變狀態，可以並行使用。
pub struct QuoteService {
    feed: Arc<dyn QuoteFeed>,
    log: Arc<dyn LogSink>,
    shutdown: watch::Sender<bool>,
}

impl QuoteService {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        let (tx, rx) = watch::channel(false);
        let feed = HttpFeed::new(SETTINGS.feed.base_url.clone(), log.clone(), rx);

        QuoteService {
            feed: Arc::new(feed),
            log,
            shutdown: tx,
        }
    }

    /// 以指定的行情來源建立服務，測試時注入假實作用。
    pub fn with_feed(feed: Arc<dyn QuoteFeed>, log: Arc<dyn LogSink>) -> Self {
        let (tx, _rx) = watch::channel(false);

        QuoteService {
            feed,
            log,
            shutdown: tx,
        }
    }

    /// 通知進行中的重試等待立即中止，供應用程式關閉時呼叫。
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// 取得指定代號的最新報價。
    ///
    /// 行情來源無法取得資料或內容解析不出任何報價時，改以模擬數據回應，
    /// 模擬清單與輸入代號一一對應。解析成功但部分行損毀時，回傳筆數
    /// 可能少於輸入代號數，這是行情來源的既有行為，不做補齊。
    pub async fn get_quotes(&self, codes: &[String]) -> Vec<Quote> {
        if codes.is_empty() {
            self.log
                .append("行情請求：未提供任何證券代號，略過本次請求".to_string());
            return Vec::new();
        }

        let market_symbols = codes
            .iter()
            .map(|code| symbol::to_market_symbol(code))
            .collect::<Vec<_>>()
            .join(",");
        let request_path = concat_string!("/list=", market_symbols);

        let text = match self.feed.fetch(&request_path).await {
            Some(text) => text,
            None => {
                self.log
                    .append("行情請求：無法取得行情內容，改用模擬數據".to_string());
                return mock::generate(codes);
            }
        };

        let quotes = parse::parse(&text);
        if quotes.is_empty() {
            self.log
                .append("行情解析：內容中沒有可用的報價，改用模擬數據".to_string());
            return mock::generate(codes);
        }

        self.log
            .append(format!("行情解析：成功解析 {} 筆報價", quotes.len()));
        quotes
    }
}
