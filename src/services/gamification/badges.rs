use std::collections::HashSet;

use tracing::info;

use super::GamificationService;
use crate::errors::Result;
use crate::models::badges::entities::BadgeCriterionType;
use crate::models::stats::entities::UserAggregateStats;

impl GamificationService {
    /// 对照当前统计检查全部徽章判据，授予新达标的徽章
    ///
    /// 判据彼此独立，一次事件可同时解锁多枚。(user, badge) 唯一索引
    /// 保证并发下每枚徽章至多授予一次，返回本次新授予的 ID 列表。
    pub async fn check_and_award_badges(
        &self,
        user_id: i64,
        stats: &UserAggregateStats,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<String>> {
        let held: HashSet<String> = self
            .storage
            .list_user_badges(user_id)
            .await?
            .into_iter()
            .map(|b| b.badge_id)
            .collect();

        let mut newly_awarded = Vec::new();
        for definition in self.badges.iter() {
            if held.contains(&definition.id) {
                continue;
            }

            let achieved = match definition.criterion.criterion_type {
                BadgeCriterionType::Xp => stats.total_xp >= definition.criterion.threshold,
                BadgeCriterionType::Streak => {
                    i64::from(stats.streak_days) >= definition.criterion.threshold
                }
                BadgeCriterionType::Exercises => {
                    i64::from(stats.exercises_completed) >= definition.criterion.threshold
                }
            };

            if achieved
                && self
                    .storage
                    .insert_user_badge(user_id, &definition.id, now.timestamp())
                    .await?
            {
                info!("授予徽章: user={user_id}, badge={}", definition.id);
                newly_awarded.push(definition.id.clone());
            }
        }

        Ok(newly_awarded)
    }
}
