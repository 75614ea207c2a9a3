//! 游戏化服务
//!
//! XP 累积（总量 + 惰性日/月桶 + 连续活跃天数）、徽章授予和排行榜。
//! 徽章目录由进程启动时注入的 BadgeRegistry 提供，运行期不可变。

mod badges;
mod leaderboard;
mod xp;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::badges::entities::AwardedBadge;
use crate::models::badges::registry::BadgeRegistry;
use crate::models::stats::entities::UserAggregateStats;
use crate::storage::Storage;

pub struct GamificationService {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) badges: Arc<BadgeRegistry>,
}

impl GamificationService {
    pub fn new(storage: Arc<dyn Storage>, badges: Arc<BadgeRegistry>) -> Self {
        Self { storage, badges }
    }

    /// 查询用户聚合统计；从未活跃的用户返回零值
    pub async fn get_stats(&self, user_id: i64) -> Result<UserAggregateStats> {
        Ok(self
            .storage
            .get_stats(user_id)
            .await?
            .map(|v| v.value)
            .unwrap_or_else(|| UserAggregateStats::empty(user_id, chrono::Utc::now())))
    }

    /// 列出用户已持有的徽章
    pub async fn list_badges(&self, user_id: i64) -> Result<Vec<AwardedBadge>> {
        self.storage.list_user_badges(user_id).await
    }
}
