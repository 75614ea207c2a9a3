use tracing::info;

use super::TaskService;
use crate::errors::{LearnSystemError, Result};
use crate::models::tasks::entities::{AssignedTask, TaskStatus};
use crate::models::tasks::requests::AssignTasksRequest;
use crate::storage::NewAssignedTask;

impl TaskService {
    /// 按模板给一批用户分配任务
    ///
    /// 幂等：同 (user, template, period_start) 已存在的组合安静跳过，
    /// 返回本次实际创建的任务。
    pub async fn assign_tasks(&self, request: AssignTasksRequest) -> Result<Vec<AssignedTask>> {
        if request.period_end <= request.period_start {
            return Err(LearnSystemError::validation(format!(
                "任务周期终点必须晚于起点: start={}, end={}",
                request.period_start, request.period_end
            )));
        }
        let targets = &request.template.targets;
        if targets.exercises_submitted < 0 || targets.levels_completed < 0 || targets.hours_spent < 0.0
        {
            return Err(LearnSystemError::validation(
                "任务目标不能为负数".to_string(),
            ));
        }

        let mut created = Vec::new();
        for user_id in &request.user_ids {
            let fresh = NewAssignedTask {
                user_id: *user_id,
                template_id: request.template.id,
                title: request.template.title.clone(),
                recurrence: request.template.recurrence,
                auto_renew: request.template.auto_renew,
                status: TaskStatus::Pending,
                period_start: request.period_start.timestamp(),
                period_end: request.period_end.timestamp(),
                targets: request.template.targets,
            };

            if let Some(task) = self.storage.insert_task(fresh).await? {
                created.push(task);
            }
        }

        info!(
            "任务分配完成: template={}, 请求 {} 人，新建 {} 条",
            request.template.id,
            request.user_ids.len(),
            created.len()
        );
        Ok(created)
    }
}
