use tracing::{debug, info};

use super::TaskService;
use crate::errors::{LearnSystemError, Result};
use crate::models::tasks::entities::{AssignedTask, MetricKind, TaskStatus};
use crate::services::{cas_backoff, cas_max_retries};
use crate::storage::TaskPatch;

impl TaskService {
    /// 把一次进度事件记入用户的活跃任务，返回被更新的任务
    ///
    /// 命中条件：任务活跃、目标组跟踪该指标、事件时刻落在任务周期内。
    /// 进度按目标截断；全部非零目标达成时任务转为 completed。
    pub async fn on_progress_event(
        &self,
        user_id: i64,
        kind: MetricKind,
        delta: f64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<AssignedTask>> {
        self.refresh_user_tasks(user_id, now).await?;
        let now_ts = now.timestamp();

        // 先收集命中任务的 ID，再逐个带重试地更新
        let candidates: Vec<i64> = self
            .storage
            .list_tasks_by_user(user_id)
            .await?
            .into_iter()
            .filter(|v| {
                let task = &v.value;
                task.status.is_active()
                    && task.targets.tracks(kind)
                    && task.period_start.timestamp() <= now_ts
                    && now_ts < task.period_end.timestamp()
            })
            .map(|v| v.value.id)
            .collect();

        let mut updated = Vec::with_capacity(candidates.len());
        for task_id in candidates {
            if let Some(task) = self
                .apply_event_to_task(user_id, task_id, kind, delta, now)
                .await?
            {
                updated.push(task);
            }
        }
        Ok(updated)
    }

    async fn apply_event_to_task(
        &self,
        user_id: i64,
        task_id: i64,
        kind: MetricKind,
        delta: f64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<AssignedTask>> {
        for attempt in 0..cas_max_retries() {
            let Some(versioned) = self
                .storage
                .list_tasks_by_user(user_id)
                .await?
                .into_iter()
                .find(|v| v.value.id == task_id)
            else {
                return Ok(None);
            };

            let mut task = versioned.value;
            if !task.status.is_active() {
                return Ok(None);
            }

            let mut current = task.current;
            current.add_clamped(kind, delta, &task.targets);

            let completed = current.meets(&task.targets);
            let status = if completed {
                TaskStatus::Completed
            } else {
                TaskStatus::InProgress
            };
            let patch = TaskPatch {
                status,
                current,
                completed_at: completed.then_some(now.timestamp()),
            };

            if self
                .storage
                .update_task_guarded(task_id, versioned.version, patch)
                .await?
            {
                if completed {
                    info!("任务完成: user={user_id}, task={task_id}");
                }
                task.status = status;
                task.current = current;
                task.completed_at = completed.then_some(now);
                task.updated_at = now;
                return Ok(Some(task));
            }

            debug!("任务 CAS 冲突，重试: task={task_id}, attempt={attempt}");
            cas_backoff(attempt).await;
        }

        Err(LearnSystemError::concurrent_update_conflict(format!(
            "任务更新持续冲突: user={user_id}, task={task_id}"
        )))
    }
}
