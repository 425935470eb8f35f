use crate::{declare::Quote, util::text};

/// 行情原文中市場代號前的標記，例如 `var hq_str_sh600000="..."`。
const CODE_MARKER: &str = "hq_str_";

/// 最少欄位數，不足表示該筆資料未傳輸完整。
const MIN_FIELDS: usize = 6;

/// 解析行情來源回傳的逐行報價原文。
///
/// 每行一筆，格式：`var hq_str_<市場代號>="<名稱>,<開盤價>,<昨收價>,<當前價>,...";`，
/// 後續欄位（最高、最低、買賣檔位等）不使用。格式不完整或價格欄位
/// 無法解析的行會被略過，單行損毀不影響其餘行的解析。
pub fn parse(text: &str) -> Vec<Quote> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Quote> {
    if line.trim().is_empty() {
        return None;
    }

    let marker = line.find(CODE_MARKER)?;
    let code_start = marker + CODE_MARKER.len();
    let code_end = line[code_start..].find('=')? + code_start;
    let market_symbol = &line[code_start..code_end];
    let code = market_symbol
        .strip_prefix("sh")
        .or_else(|| market_symbol.strip_prefix("sz"))
        .unwrap_or(market_symbol);

    let payload_start = line.find('"')? + 1;
    let payload_end = line.rfind('"')?;
    if payload_start >= payload_end {
        return None;
    }

    let fields: Vec<&str> = line[payload_start..payload_end].split(',').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    // 欄位 0-3：名稱、開盤價、昨收價、當前價，停牌時價格欄位可能不是數字
    let open_price = text::parse_decimal(fields[1]).ok()?;
    let previous_close = text::parse_decimal(fields[2]).ok()?;
    let current_price = text::parse_decimal(fields[3]).ok()?;

    Some(Quote::from_feed(
        code.to_string(),
        fields[0].to_string(),
        open_price,
        previous_close,
        current_price,
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    const WELL_FORMED: &str =
        r#"var hq_str_sh600000="浦发银行,10.900,10.930,10.910,10.980,10.890";"#;

    #[test]
    fn test_parse_when_empty() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse("\n  \n").is_empty());
    }

    #[test]
    fn test_parse_single_line() {
        let quotes = parse(WELL_FORMED);
        assert_eq!(quotes.len(), 1);

        let quote = &quotes[0];
        assert_eq!(quote.code, "600000");
        assert_eq!(quote.name, "浦发银行");
        assert_eq!(quote.open_price, dec!(10.9000));
        assert_eq!(quote.current_price, dec!(10.9100));
        assert_eq!(quote.change_amount, dec!(-0.0200));
        assert_eq!(quote.change_percent, dec!(-0.1830));
    }

    #[test]
    fn test_parse_strips_market_prefix() {
        let text = r#"var hq_str_sz000001="平安银行,10.000,10.000,10.500,10.600,9.900";"#;
        let quotes = parse(text);
        assert_eq!(quotes[0].code, "000001");
    }

    #[test]
    fn test_parse_skips_short_line() {
        // 只有 5 個欄位，資料未傳輸完整
        let text = r#"var hq_str_sh600000="浦发银行,10.900,10.930,10.910,10.980";"#;
        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_line_keeps_rest() {
        let text = format!(
            "var hq_str_sh600004=\"白云机场,not,a,number,1,2\";\n{}",
            WELL_FORMED
        );
        let quotes = parse(&text);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].code, "600000");
    }

    #[test]
    fn test_parse_skips_line_without_marker_or_quotes() {
        assert!(parse("var nothing_here=1;").is_empty());
        assert!(parse("var hq_str_sh600000=unquoted;").is_empty());
        assert!(parse(r#"var hq_str_sh600000"no equals sign""#).is_empty());
    }

    #[test]
    fn test_parse_when_previous_close_is_zero() {
        let text = r#"var hq_str_sh600000="浦发银行,10.000,0.000,10.500,10.600,9.900";"#;
        let quotes = parse(text);
        assert_eq!(quotes[0].change_amount, dec!(10.5000));
        assert_eq!(quotes[0].change_percent, dec!(0));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let text = format!("{}\nvar broken line\n", WELL_FORMED);
        assert_eq!(parse(&text), parse(&text));
    }
}
