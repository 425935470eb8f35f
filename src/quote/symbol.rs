use concat_string::concat_string;

/// 將使用者輸入的證券代號轉成行情來源使用的市場代號。
///
/// 依序比對下列規則，先符合者為準；全部不符合時原樣回傳，
/// 不做格式驗證，查不到的代號由行情來源自行忽略。
pub fn to_market_symbol(code: &str) -> String {
    if code.len() == 6 && code.starts_with('6') {
        // 上海主板
        concat_string!("sh", code)
    } else if code.len() == 6 && code.starts_with('0') {
        // 深圳主板
        concat_string!("sz", code)
    } else if code.len() == 6 && code.starts_with('3') {
        // 創業板
        concat_string!("sz", code)
    } else if (code.len() == 6 || code.len() == 5) && code.starts_with('5') {
        // 基金
        concat_string!("sh", code)
    } else if code.len() == 6 && code.starts_with("15") {
        // ETF
        concat_string!("sz", code)
    } else {
        code.to_string()
    }
}
