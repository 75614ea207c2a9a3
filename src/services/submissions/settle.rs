use tracing::warn;

use super::SubmissionService;
use crate::errors::Result;
use crate::models::progress::entities::FirstCompletion;
use crate::models::tasks::entities::MetricKind;

impl SubmissionService {
    /// 结算一次首次完成的奖励
    ///
    /// xp_granted 置位是领取凭证，和统计入账在同一事务里提交：入账
    /// 失败时标记随之回滚，欠账留给下次提交结清；标记已被占用说明
    /// 奖励已入账，直接返回零。
    pub(crate) async fn settle_award(
        &self,
        record_id: i64,
        first: &FirstCompletion,
    ) -> Result<(i64, Vec<String>)> {
        let now = chrono::Utc::now();
        let Some(stats) = self
            .gamification
            .apply_xp_gain(record_id, first.user_id, first.xp, first.completed_level, now)
            .await?
        else {
            return Ok((0, Vec::new()));
        };
        let badges = self
            .gamification
            .check_and_award_badges(first.user_id, &stats, now)
            .await?;

        // 任务事件失败只记日志，不影响 XP/徽章已完成的入账
        if let Err(e) = self
            .tasks
            .on_progress_event(first.user_id, MetricKind::ExercisesSubmitted, 1.0, now)
            .await
        {
            warn!("任务进度事件失败: user={}, error={e}", first.user_id);
        }
        if first.completed_level.is_some()
            && let Err(e) = self
                .tasks
                .on_progress_event(first.user_id, MetricKind::LevelsCompleted, 1.0, now)
                .await
        {
            warn!("任务关卡事件失败: user={}, error={e}", first.user_id);
        }

        Ok((first.xp, badges))
    }

    /// 结清某用户全部已完成但未入账的奖励
    ///
    /// 由提交管线在入口处惰性调用，覆盖上次结算中途失败留下的欠账。
    pub(crate) async fn settle_pending_awards(&self, user_id: i64) -> Result<()> {
        for record in self.storage.list_pending_awards(user_id).await? {
            let Some(exercise) = self.catalog.get_exercise(record.exercise_id).await? else {
                warn!(
                    "待入账进度对应的练习已不存在，跳过: exercise={}",
                    record.exercise_id
                );
                continue;
            };

            let completed_level = self
                .progress
                .check_level_completion(user_id, &exercise)
                .await?;

            let first = FirstCompletion {
                user_id,
                exercise_id: exercise.id,
                xp: i64::from(exercise.points),
                completed_level,
            };
            self.settle_award(record.id, &first).await?;
        }
        Ok(())
    }
}
