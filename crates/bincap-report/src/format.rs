//! 數值顯示格式（僅用於畫面，匯出保留純數值）

use rust_decimal::{Decimal, RoundingStrategy};

/// 四捨五入到 2 位小數
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// 2 位小數並加上千分位，例如 `1234.5` → `1,234.50`
pub fn format_decimal(value: Decimal) -> String {
    let text = round2(value).to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}.{}", group_thousands(integer), fraction)
}

/// 整數加上千分位
pub fn format_integer(value: i64) -> String {
    group_thousands(&value.to_string())
}

/// 非負計數加上千分位
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}
