use tracing::debug;

use super::TaskService;
use crate::errors::Result;
use crate::models::tasks::entities::{AssignedTask, TaskStatus};
use crate::storage::{NewAssignedTask, TaskPatch};

impl TaskService {
    /// 惰性刷新用户任务的到期与续期状态
    ///
    /// 周期已结束的活跃任务标记为 expired；auto_renew 的周期任务
    /// 直接在包含 now 的周期上开新任务，中间错过的周期不补建。
    /// (user, template, period_start) 唯一索引兜底并发刷新。
    pub(crate) async fn refresh_user_tasks(
        &self,
        user_id: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        let now_ts = now.timestamp();

        for versioned in self.storage.list_tasks_by_user(user_id).await? {
            let task = &versioned.value;
            if !task.status.is_active() || now_ts < task.period_end.timestamp() {
                continue;
            }

            // CAS 失败说明别的调用刚处理过，无需重试
            let expired = self
                .storage
                .update_task_guarded(
                    task.id,
                    versioned.version,
                    TaskPatch {
                        status: TaskStatus::Expired,
                        current: task.current,
                        completed_at: None,
                    },
                )
                .await?;
            if !expired {
                debug!("任务过期标记被并发处理: task={}", task.id);
                continue;
            }

            if task.auto_renew {
                self.renew_into_current_period(task, now_ts).await?;
            }
        }

        Ok(())
    }

    async fn renew_into_current_period(&self, task: &AssignedTask, now_ts: i64) -> Result<()> {
        let Some(period_len) = task.recurrence.period_seconds() else {
            return Ok(());
        };

        // 跳到包含 now 的周期，错过的周期不回填
        let elapsed = now_ts - task.period_start.timestamp();
        let periods_ahead = elapsed.div_euclid(period_len);
        let new_start = task.period_start.timestamp() + periods_ahead * period_len;

        let fresh = NewAssignedTask {
            user_id: task.user_id,
            template_id: task.template_id,
            title: task.title.clone(),
            recurrence: task.recurrence,
            auto_renew: task.auto_renew,
            status: TaskStatus::Pending,
            period_start: new_start,
            period_end: new_start + period_len,
            targets: task.targets,
        };

        if self.storage.insert_task(fresh).await?.is_some() {
            debug!(
                "任务续期: user={}, template={}, period_start={new_start}",
                task.user_id, task.template_id
            );
        }
        Ok(())
    }
}
