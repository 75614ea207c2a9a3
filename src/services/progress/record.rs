use std::collections::HashSet;

use tracing::debug;

use super::ProgressService;
use crate::errors::{LearnSystemError, Result};
use crate::models::exercises::entities::ExerciseDefinition;
use crate::models::progress::entities::{FirstCompletion, UserProgressRecord};
use crate::models::submissions::entities::EvaluationResult;
use crate::services::{cas_backoff, cas_max_retries};
use crate::storage::{NewProgress, ProgressPatch};

impl ProgressService {
    /// 把一次判定结果记入进度行
    ///
    /// 棘轮语义：completed 只能 false→true，best_points 只增不减，
    /// attempts 无条件 +1。从未完成到完成的那一次返回 FirstCompletion。
    pub async fn record_submission(
        &self,
        user_id: i64,
        exercise: &ExerciseDefinition,
        evaluation: &EvaluationResult,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<(UserProgressRecord, Option<FirstCompletion>)> {
        let now_ts = now.timestamp();

        for attempt in 0..cas_max_retries() {
            match self.storage.get_progress(user_id, exercise.id).await? {
                None => {
                    let fresh = NewProgress {
                        user_id,
                        exercise_id: exercise.id,
                        completed: evaluation.correct,
                        best_points: evaluation.points_earned,
                        last_submitted_at: now_ts,
                    };
                    // None 表示并发首次提交撞了唯一索引，转入更新路径
                    if let Some(record) = self.storage.insert_progress(fresh).await? {
                        let first = if evaluation.correct {
                            Some(self.build_first_completion(user_id, exercise).await?)
                        } else {
                            None
                        };
                        return Ok((record, first));
                    }
                }
                Some(existing) => {
                    let was_completed = existing.value.completed;
                    let patch = ProgressPatch {
                        completed: was_completed || evaluation.correct,
                        best_points: existing.value.best_points.max(evaluation.points_earned),
                        attempts: existing.value.attempts + 1,
                        last_submitted_at: now_ts,
                    };

                    if self
                        .storage
                        .update_progress_guarded(existing.value.id, existing.version, patch.clone())
                        .await?
                    {
                        let record = UserProgressRecord {
                            completed: patch.completed,
                            best_points: patch.best_points,
                            attempts: patch.attempts,
                            last_submitted_at: now,
                            updated_at: now,
                            ..existing.value
                        };
                        let first = if evaluation.correct && !was_completed {
                            Some(self.build_first_completion(user_id, exercise).await?)
                        } else {
                            None
                        };
                        return Ok((record, first));
                    }

                    debug!(
                        "进度 CAS 冲突，重试: user={user_id}, exercise={}, attempt={attempt}",
                        exercise.id
                    );
                }
            }
            cas_backoff(attempt).await;
        }

        Err(LearnSystemError::concurrent_update_conflict(format!(
            "进度更新持续冲突: user={user_id}, exercise={}",
            exercise.id
        )))
    }

    async fn build_first_completion(
        &self,
        user_id: i64,
        exercise: &ExerciseDefinition,
    ) -> Result<FirstCompletion> {
        Ok(FirstCompletion {
            user_id,
            exercise_id: exercise.id,
            xp: i64::from(exercise.points),
            completed_level: self.check_level_completion(user_id, exercise).await?,
        })
    }

    /// 关卡汇总：本次完成是否补齐了所在关卡的最后一个缺口
    pub(crate) async fn check_level_completion(
        &self,
        user_id: i64,
        exercise: &ExerciseDefinition,
    ) -> Result<Option<i64>> {
        let Some(level) = self.catalog.get_level(exercise.level_id).await? else {
            // 目录里没有该关卡就只计练习，不计关卡
            return Ok(None);
        };

        let completed: HashSet<i64> = self
            .storage
            .list_progress_by_user(user_id)
            .await?
            .into_iter()
            .filter(|r| r.completed)
            .map(|r| r.exercise_id)
            .collect();

        let all_done = level.exercise_ids.iter().all(|id| completed.contains(id));
        Ok(all_done.then_some(level.id))
    }
}
