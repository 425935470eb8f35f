use std::{sync::Arc, time::Duration};

pub mod config;
pub mod declare;
pub mod logging;
pub mod quote;
pub mod util;

use crate::quote::{FileLogSink, QuoteService};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let codes = config::SETTINGS.watch.stock_codes.clone();
    let interval = Duration::from_secs(config::SETTINGS.watch.update_interval.max(1));
    let service = QuoteService::new(Arc::new(FileLogSink));
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for quote in service.get_quotes(&codes).await {
                    logging::info_console(format!(
                        "{} {} 現價 {} 開盤 {} 漲跌 {}（{}%）",
                        quote.code,
                        quote.name,
                        quote.current_price,
                        quote.open_price,
                        quote.change_amount,
                        quote.change_percent
                    ));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                logging::info_console("收到中斷訊號，結束輪詢".to_string());
                service.shutdown();
                break;
            }
        }
    }
}
