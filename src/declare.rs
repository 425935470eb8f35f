use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 行情來源欄位保留的小數位數。
const FEED_SCALE: u32 = 4;

/// 一檔證券的最新報價快照。
///
/// 每次輪詢都會重新建立整批資料，呼叫端以整批替換的方式更新畫面，
/// 不會就地修改單筆報價。
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Quote {
    /// 證券代號（不含市場前綴）
    pub code: String,
    /// 顯示名稱
    pub name: String,
    /// 當前價
    pub current_price: Decimal,
    /// 開盤價
    pub open_price: Decimal,
    /// 漲跌金額
    pub change_amount: Decimal,
    /// 漲跌幅（百分比）
    pub change_percent: Decimal,
}

impl Quote {
    /// 以行情來源的欄位建立報價。
    ///
    /// 漲跌以昨收價為基準：漲跌金額 = 當前價 - 昨收價，
    /// 漲跌幅 = 漲跌金額 / 昨收價 * 100。昨收價不為正數時漲跌幅視為 0。
    /// 四個數值欄位均保留 4 位小數。
    pub fn from_feed(
        code: String,
        name: String,
        open_price: Decimal,
        previous_close: Decimal,
        current_price: Decimal,
    ) -> Self {
        let change_amount = current_price - previous_close;
        let change_percent = if previous_close > Decimal::ZERO {
            change_amount / previous_close * dec!(100)
        } else {
            Decimal::ZERO
        };

        Quote {
            code,
            name,
            current_price: current_price.round_dp(FEED_SCALE),
            open_price: open_price.round_dp(FEED_SCALE),
            change_amount: change_amount.round_dp(FEED_SCALE),
            change_percent: change_percent.round_dp(FEED_SCALE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_feed() {
        let quote = Quote::from_feed(
            "600000".to_string(),
            "浦发银行".to_string(),
            dec!(10.900),
            dec!(10.930),
            dec!(10.910),
        );

        assert_eq!(quote.open_price, dec!(10.9000));
        assert_eq!(quote.current_price, dec!(10.9100));
        assert_eq!(quote.change_amount, dec!(-0.0200));
        assert_eq!(quote.change_percent, dec!(-0.1830));
    }

    #[test]
    fn test_from_feed_when_previous_close_is_zero() {
        let quote = Quote::from_feed(
            "600000".to_string(),
            "浦发银行".to_string(),
            dec!(10.900),
            Decimal::ZERO,
            dec!(10.910),
        );

        assert_eq!(quote.change_amount, dec!(10.9100));
        assert_eq!(quote.change_percent, Decimal::ZERO);
    }
}
