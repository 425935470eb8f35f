use std::collections::HashMap;

use concat_string::concat_string;
use once_cell::sync::Lazy;
use rand::{Rng, RngExt};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::declare::Quote;

/// 模擬數值保留的小數位數，刻意比真實行情的 4 位粗糙。
const MOCK_SCALE: u32 = 2;

/// 常見證券代號對應的真實名稱。
static STOCK_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("000001", "平安银行"),
        ("000002", "万科A"),
        ("000004", "国华网安"),
        ("000005", "世纪星源"),
        ("000006", "深振业A"),
        ("600000", "浦发银行"),
        ("600004", "白云机场"),
        ("600005", "武钢股份"),
        ("600006", "东风汽车"),
        ("600007", "中国国贸"),
        ("510050", "上证50ETF"),
        ("510300", "沪深300ETF"),
        ("510500", "中证500ETF"),
        ("159919", "创业板ETF"),
        ("159928", "消费ETF"),
        ("159949", "创业板50"),
        ("512880", "银行ETF"),
        ("512480", "半导体ETF"),
        ("512170", "医疗ETF"),
    ])
});

const INDUSTRIES: [&str; 10] = [
    "科技", "金融", "医药", "消费", "能源", "制造", "地产", "农业", "传媒", "物流",
];

const COMPANY_TYPES: [&str; 10] = [
    "股份", "集团", "科技", "发展", "控股", "实业", "投资", "产业", "国际", "中国",
];

/// 為每個代號產生一筆模擬報價，行情來源完全無法使用時的退路。
///
/// 輸出筆數與輸入代號一一對應且順序一致，永遠不會失敗。
pub fn generate(codes: &[String]) -> Vec<Quote> {
    generate_with_rng(codes, &mut rand::rng())
}

/// 以指定的亂數來源產生模擬報價，測試時以固定種子取得可重現的結果。
pub fn generate_with_rng<R: Rng>(codes: &[String], rng: &mut R) -> Vec<Quote> {
    codes.iter().map(|code| synthesize(code, rng)).collect()
}

fn synthesize<R: Rng>(code: &str, rng: &mut R) -> Quote {
    let name = match STOCK_NAMES.get(code) {
        Some(real_name) => (*real_name).to_string(),
        None => concat_string!(
            INDUSTRIES[rng.random_range(0..INDUSTRIES.len())],
            COMPANY_TYPES[rng.random_range(0..COMPANY_TYPES.len())]
        ),
    };

    // 基礎價格在 5-200 之間，開盤價上下浮動 1 元，當前價上下浮動 5 元
    let base_price = Decimal::from(rng.random_range(5i64..200));
    let open_price = base_price + Decimal::new(rng.random_range(-100..=100), 2);
    let current_price = base_price + Decimal::new(rng.random_range(-500..=500), 2);

    // 模擬數據沒有昨收價的概念，漲跌以開盤價為基準
    let change_amount = current_price - open_price;
    let change_percent = change_amount / open_price * dec!(100);

    Quote {
        code: code.to_string(),
        name,
        current_price: current_price.round_dp(MOCK_SCALE),
        open_price: open_price.round_dp(MOCK_SCALE),
        change_amount: change_amount.round_dp(MOCK_SCALE),
        change_percent: change_percent.round_dp(MOCK_SCALE),
    }
}
