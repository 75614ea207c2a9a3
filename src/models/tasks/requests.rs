use serde::Deserialize;
use ts_rs::TS;

use crate::models::tasks::entities::{TaskMetrics, TaskRecurrence};

/// 任务模板（管理端/家长端定义，分配时展开成 AssignedTask）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskTemplate {
    pub id: i64,
    pub title: String,
    pub recurrence: TaskRecurrence,
    pub auto_renew: bool,
    pub targets: TaskMetrics,
}

/// 批量分配任务请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct AssignTasksRequest {
    pub template: TaskTemplate,
    pub user_ids: Vec<i64>,
    pub period_start: chrono::DateTime<chrono::Utc>,
    pub period_end: chrono::DateTime<chrono::Utc>,
}
