//! 网关时间戳工具
//!
//! 网关的 `timestamp` 参数使用东八区时间，格式为 `YYYY-MM-DD HH:MM:SS`，
//! 与服务器时间相差超过 10 分钟的请求会被拒绝。

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

/// `timestamp` 参数格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 网关所在时区的 UTC 偏移（秒）
const GATEWAY_UTC_OFFSET_SECS: i32 = 8 * 3600;

fn gateway_offset() -> FixedOffset {
    FixedOffset::east_opt(GATEWAY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// 将 UTC 时间格式化为网关时间戳
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&gateway_offset())
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// 解析网关时间戳（按东八区解释）
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()?;
    gateway_offset()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 解析 Unix 时间戳（自动判断秒/毫秒）
pub fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // 大于 10^11 视为毫秒（令牌过期时间使用毫秒）
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
