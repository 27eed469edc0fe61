//! 时间显示
//!
//! 后端的 `created_at` 是 Python `isoformat()` 的结果，可能带时区也可能不带。
//! 这里统一解析并格式化为界面上的日期字符串。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 缺失或无法解析时显示的占位符
pub const PLACEHOLDER: &str = "—";

/// 解析 ISO 8601 时间，时区信息会被丢弃（按原样显示墙上时间）
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `2024-05-01`
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `2024-05-01 10:30`
pub fn format_datetime(raw: Option<&str>) -> String {
    raw.and_then(parse)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_isoformat_with_micros() {
        assert_eq!(
            format_datetime(Some("2024-05-01T10:30:12.123456")),
            "2024-05-01 10:30"
        );
        assert_eq!(format_date(Some("2024-05-01T10:30:12")), "2024-05-01");
    }

    #[test]
    fn offsets_keep_wall_clock_time() {
        assert_eq!(
            format_datetime(Some("2024-12-31T23:05:00+03:00")),
            "2024-12-31 23:05"
        );
    }

    #[test]
    fn bare_dates_and_garbage() {
        assert_eq!(format_date(Some("2023-01-09")), "2023-01-09");
        assert_eq!(format_date(Some("yesterday")), PLACEHOLDER);
        assert_eq!(format_date(None), PLACEHOLDER);
    }
}
