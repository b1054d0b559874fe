//! 金额序列化辅助
//!
//! 服务端以十进制字符串（如 `"12.50"`）传输金额，偶尔也会是数字。
//! 前端内部统一使用整数分（cents）计算，避免浮点误差。
//!
//! 用法：`#[serde(with = "bookstore_shared::money::cents")]`

use std::fmt;

/// 解析十进制金额字符串为分
///
/// 超过两位的小数部分会被截断；空字符串或非法字符返回 `None`。
pub fn parse_cents(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let units: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let mut frac = frac_part.chars().take(2).collect::<String>();
    while frac.len() < 2 {
        frac.push('0');
    }
    let hundredths: i64 = frac.parse().ok()?;

    let value = units.checked_mul(100)?.checked_add(hundredths)?;
    Some(if negative { -value } else { value })
}

/// 以 `"12.50"` 形式格式化金额
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// 以欧元展示金额，例如 `12,50 €`
pub fn display_euros(cents: i64) -> String {
    format!("{} €", format_cents(cents).replace('.', ","))
}

pub mod cents {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Int(i64),
        Float(f64),
    }

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_cents(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(s) => super::parse_cents(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid amount: {}", s))),
            RawAmount::Int(units) => units
                .checked_mul(100)
                .ok_or_else(|| de::Error::custom("amount overflow")),
            RawAmount::Float(f) => super::parse_cents(&format!("{:.2}", f))
                .ok_or_else(|| de::Error::custom(format!("invalid amount: {}", f))),
        }
    }
}

/// 以分为单位的金额，主要用于界面展示
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Cents(pub i64);

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", display_euros(self.0))
    }
}
