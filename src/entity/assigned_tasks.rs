//! 任务分配实体

use sea_orm::entity::prelude::*;

use crate::models::tasks::entities::{AssignedTask, TaskMetrics, TaskRecurrence, TaskStatus};

use super::user_progress::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assigned_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub title: String,
    pub recurrence: String,
    pub auto_renew: bool,
    pub status: String,
    pub period_start: i64,
    pub period_end: i64,
    pub target_exercises: i32,
    pub target_levels: i32,
    pub target_hours: f64,
    pub current_exercises: i32,
    pub current_levels: i32,
    pub current_hours: f64,
    pub completed_at: Option<i64>,
    pub lock_version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为领域模型；status/recurrence 列损坏时回退到保守取值
    pub fn into_task(self) -> AssignedTask {
        AssignedTask {
            id: self.id,
            user_id: self.user_id,
            template_id: self.template_id,
            title: self.title,
            recurrence: self.recurrence.parse().unwrap_or(TaskRecurrence::Once),
            auto_renew: self.auto_renew,
            status: self.status.parse().unwrap_or(TaskStatus::Expired),
            period_start: to_datetime(self.period_start),
            period_end: to_datetime(self.period_end),
            targets: TaskMetrics {
                exercises_submitted: self.target_exercises,
                levels_completed: self.target_levels,
                hours_spent: self.target_hours,
            },
            current: TaskMetrics {
                exercises_submitted: self.current_exercises,
                levels_completed: self.current_levels,
                hours_spent: self.current_hours,
            },
            completed_at: self.completed_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
