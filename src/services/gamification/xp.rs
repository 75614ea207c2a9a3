use tracing::debug;

use super::GamificationService;
use crate::errors::{LearnSystemError, Result};
use crate::models::stats::entities::UserAggregateStats;
use crate::services::{cas_backoff, cas_max_retries};
use crate::storage::XpCommitOutcome;
use crate::utils::time_window::{day_start, is_previous_day, month_start};

impl GamificationService {
    /// 把一次首次完成记入用户统计
    ///
    /// record_id 指向触发本次入账的进度行，其 xp_granted 是领取凭证：
    /// 标记置位和统计写入在存储层同一事务提交，标记已被占用时返回
    /// None，入账失败时标记随事务回滚，欠账可被再次结算。单次提交里
    /// 同时更新总 XP、日/月桶、连续活跃天数、完成练习数，以及（若
    /// completed_level 存在且未计过）通关关卡数。窗口翻转在这里惰性发生。
    pub async fn apply_xp_gain(
        &self,
        record_id: i64,
        user_id: i64,
        xp: i64,
        completed_level: Option<i64>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<UserAggregateStats>> {
        for attempt in 0..cas_max_retries() {
            let (mut stats, version) = match self.storage.get_stats(user_id).await? {
                None => (UserAggregateStats::empty(user_id, now), None),
                Some(existing) => (existing.value, Some(existing.version)),
            };
            apply_gain(&mut stats, xp, completed_level, now);

            match self
                .storage
                .commit_xp_award(record_id, &stats, version)
                .await?
            {
                XpCommitOutcome::Committed => return Ok(Some(stats)),
                XpCommitOutcome::AlreadyGranted => return Ok(None),
                XpCommitOutcome::Conflict => {
                    debug!("统计 CAS 冲突，重试: user={user_id}, attempt={attempt}");
                }
            }
            cas_backoff(attempt).await;
        }

        Err(LearnSystemError::concurrent_update_conflict(format!(
            "统计更新持续冲突: user={user_id}"
        )))
    }
}

fn apply_gain(
    stats: &mut UserAggregateStats,
    xp: i64,
    completed_level: Option<i64>,
    now: chrono::DateTime<chrono::Utc>,
) {
    let now_ts = now.timestamp();
    let today = day_start(now_ts);

    stats.total_xp += xp;
    stats.daily.accumulate(today, xp);
    stats.monthly.accumulate(month_start(now_ts), xp);
    stats.exercises_completed += 1;

    // completed_level_ids 集合保证关卡只计一次
    if let Some(level_id) = completed_level
        && !stats.completed_level_ids.contains(&level_id)
    {
        stats.completed_level_ids.push(level_id);
        stats.levels_completed += 1;
    }

    // 连续活跃：同日不变，昨日 +1，断档归 1
    if stats.last_active_day != today {
        if is_previous_day(stats.last_active_day, today) {
            stats.streak_days += 1;
        } else {
            stats.streak_days = 1;
        }
        stats.last_active_day = today;
    }

    stats.updated_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ts: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc.timestamp_opt(ts, 0).unwrap()
    }

    // 2026-03-15 13:45:30 UTC
    const TS: i64 = 1_773_582_330;

    #[test]
    fn test_gain_updates_total_and_buckets() {
        let mut stats = UserAggregateStats::empty(1, at(TS));
        apply_gain(&mut stats, 10, None, at(TS));
        apply_gain(&mut stats, 5, None, at(TS + 60));

        assert_eq!(stats.total_xp, 15);
        assert_eq!(stats.daily.xp, 15);
        assert_eq!(stats.monthly.xp, 15);
        assert_eq!(stats.exercises_completed, 2);
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_daily_bucket_resets_next_day_total_keeps() {
        let mut stats = UserAggregateStats::empty(1, at(TS));
        apply_gain(&mut stats, 10, None, at(TS));
        apply_gain(&mut stats, 7, None, at(TS + 86_400));

        assert_eq!(stats.total_xp, 17);
        assert_eq!(stats.daily.xp, 7);
        // 连续两天活跃
        assert_eq!(stats.streak_days, 2);
    }

    #[test]
    fn test_streak_breaks_after_gap() {
        let mut stats = UserAggregateStats::empty(1, at(TS));
        apply_gain(&mut stats, 10, None, at(TS));
        apply_gain(&mut stats, 10, None, at(TS + 86_400));
        assert_eq!(stats.streak_days, 2);

        // 隔两天再来，归 1
        apply_gain(&mut stats, 10, None, at(TS + 3 * 86_400));
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_level_counted_once() {
        let mut stats = UserAggregateStats::empty(1, at(TS));
        apply_gain(&mut stats, 10, Some(42), at(TS));
        apply_gain(&mut stats, 10, Some(42), at(TS));

        assert_eq!(stats.levels_completed, 1);
        assert_eq!(stats.completed_level_ids, vec![42]);
    }
}
