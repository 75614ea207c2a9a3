use serde::{Deserialize, Serialize};
use ts_rs::TS;

// XP 窗口桶（日/月）
//
// window_start 是该桶所属窗口的 UTC 起点（日初/月初的 epoch 秒）。
// 窗口翻转是惰性的：只在下一次 XP 事件到达时比对并重置，没有后台定时器，
// 因此长期不活跃的用户会携带陈旧的桶值，直到下一次事件到来。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct XpBucket {
    pub window_start: i64,
    pub xp: i64,
}

impl XpBucket {
    /// 把 amount 记入桶；事件落在新窗口时先重置
    pub fn accumulate(&mut self, window_start: i64, amount: i64) {
        if window_start != self.window_start {
            self.window_start = window_start;
            self.xp = amount;
        } else {
            self.xp += amount;
        }
    }
}

// 用户聚合统计（每用户一条）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct UserAggregateStats {
    pub user_id: i64,
    // 总 XP，单调不减
    pub total_xp: i64,
    pub exercises_completed: i32,
    pub levels_completed: i32,
    // 已通关的关卡 ID 集合，保证 levels_completed 在重试下幂等
    pub completed_level_ids: Vec<i64>,
    pub daily: XpBucket,
    pub monthly: XpBucket,
    // 连续活跃天数：连续的、至少产生一次 XP 事件的 UTC 日历日
    pub streak_days: i32,
    // 最近一次活跃日的 UTC 日初 epoch 秒
    pub last_active_day: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserAggregateStats {
    /// 新用户的零值统计
    pub fn empty(user_id: i64, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            user_id,
            total_xp: 0,
            exercises_completed: 0,
            levels_completed: 0,
            completed_level_ids: Vec::new(),
            daily: XpBucket {
                window_start: 0,
                xp: 0,
            },
            monthly: XpBucket {
                window_start: 0,
                xp: 0,
            },
            streak_days: 0,
            last_active_day: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_accumulates_within_window() {
        let mut bucket = XpBucket {
            window_start: 1000,
            xp: 30,
        };
        bucket.accumulate(1000, 20);
        assert_eq!(bucket.xp, 50);
        assert_eq!(bucket.window_start, 1000);
    }

    #[test]
    fn test_bucket_resets_on_new_window() {
        let mut bucket = XpBucket {
            window_start: 1000,
            xp: 30,
        };
        bucket.accumulate(2000, 20);
        assert_eq!(bucket.xp, 20);
        assert_eq!(bucket.window_start, 2000);
    }
}
