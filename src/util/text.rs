use std::str::FromStr;

use anyhow::{anyhow, Result};
use encoding_rs::GBK;
use rust_decimal::Decimal;

const NUMBER_ESCAPE_CHAR: &[char] = &[',', ' ', '"', '\r', '\n'];

/// Converts a GBK encoded `&[u8]` to a UTF-8 `String`.
///
/// 行情來源的原生編碼不是 UTF-8，必須先以 GBK 解碼。
/// 位元組序列不是合法的 GBK 時回傳錯誤，由呼叫端決定是否改用其他編碼。
pub fn gbk_2_utf8(data: &[u8]) -> Result<String> {
    let (decoded, _, had_errors) = GBK.decode(data);
    if had_errors {
        return Err(anyhow!("Failed to decode bytes as GBK"));
    }

    Ok(decoded.into_owned())
}

/// 以 UTF-8 嚴格解碼位元組序列。
pub fn utf8(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec())
        .map_err(|why| anyhow!("Failed to decode bytes as UTF-8 because {:?}", why))
}

/// Parses a decimal value from a given string.
///
/// 解析前會先除去千分位逗號、引號與空白等符號，解析失敗時回傳錯誤。
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !NUMBER_ESCAPE_CHAR.contains(c))
        .collect();

    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}
