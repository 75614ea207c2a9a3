use super::GamificationService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::stats::responses::{LeaderboardEntry, LeaderboardResponse, LeaderboardScope};
use crate::utils::time_window::{day_start, month_start};

impl GamificationService {
    /// 读时排序的排行榜
    ///
    /// 没有物化榜单，直接按口径对统计表排序取前 N。
    pub async fn leaderboard(
        &self,
        scope: LeaderboardScope,
        limit: Option<u64>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<LeaderboardResponse> {
        let config = &AppConfig::get().gamification.leaderboard;
        let limit = limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit);

        let now_ts = now.timestamp();
        let window_start = match scope {
            LeaderboardScope::Total => 0,
            LeaderboardScope::Daily => day_start(now_ts),
            LeaderboardScope::Monthly => month_start(now_ts),
        };

        let rows = self
            .storage
            .list_leaderboard(scope, window_start, limit)
            .await?;

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| LeaderboardEntry {
                rank: i as i64 + 1,
                user_id: row.user_id,
                xp: row.xp,
            })
            .collect();

        Ok(LeaderboardResponse {
            scope,
            entries,
            generated_at: now,
        })
    }
}
