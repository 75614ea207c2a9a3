//! 日历窗口计算
//!
//! XP 日/月桶和连续活跃天数都以 UTC 日历为准。
//! 窗口起点统一用 epoch 秒表示，方便直接落库比较。

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

fn to_utc(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}

/// 事件所在 UTC 日历日的起点（当日 00:00:00 的 epoch 秒）
pub fn day_start(ts: i64) -> i64 {
    ts.div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY
}

/// 事件所在 UTC 日历月的起点（当月 1 日 00:00:00 的 epoch 秒）
pub fn month_start(ts: i64) -> i64 {
    let date = to_utc(ts).date_naive();
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc().timestamp())
        .unwrap_or(0)
}

/// prev_day 是否恰好是 cur_day 的前一天（两者都是日初 epoch 秒）
pub fn is_previous_day(prev_day: i64, cur_day: i64) -> bool {
    cur_day - prev_day == SECONDS_PER_DAY
}
