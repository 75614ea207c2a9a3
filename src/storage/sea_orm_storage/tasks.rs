use super::SeaOrmStorage;
use crate::entity::assigned_tasks::{ActiveModel, Column, Entity as AssignedTasks};
use crate::errors::{LearnSystemError, Result};
use crate::models::tasks::entities::AssignedTask;
use crate::storage::{NewAssignedTask, TaskPatch, Versioned};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 新建任务行
    ///
    /// (user, template, period_start) 唯一索引兜底惰性续期的并发创建，
    /// 撞索引返回 None，调用方重新读取即可拿到别人创建的那条。
    pub async fn insert_task_impl(&self, fresh: NewAssignedTask) -> Result<Option<AssignedTask>> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(fresh.user_id),
            template_id: Set(fresh.template_id),
            title: Set(fresh.title),
            recurrence: Set(fresh.recurrence.to_string()),
            auto_renew: Set(fresh.auto_renew),
            status: Set(fresh.status.to_string()),
            period_start: Set(fresh.period_start),
            period_end: Set(fresh.period_end),
            target_exercises: Set(fresh.targets.exercises_submitted),
            target_levels: Set(fresh.targets.levels_completed),
            target_hours: Set(fresh.targets.hours_spent),
            current_exercises: Set(0),
            current_levels: Set(0),
            current_hours: Set(0.0),
            completed_at: Set(None),
            lock_version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok(Some(result.into_task())),
            Err(e) if Self::is_unique_violation(&e) => Ok(None),
            Err(e) => Err(LearnSystemError::database_operation(format!(
                "创建任务失败: {e}"
            ))),
        }
    }

    /// 列出用户全部任务
    pub async fn list_tasks_by_user_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<Versioned<AssignedTask>>> {
        let rows = AssignedTasks::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::PeriodStart)
            .order_by_asc(Column::TemplateId)
            .all(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("查询任务列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|m| Versioned {
                version: m.lock_version,
                value: m.into_task(),
            })
            .collect())
    }

    /// CAS 更新任务行
    pub async fn update_task_guarded_impl(
        &self,
        task_id: i64,
        expected_version: i64,
        patch: TaskPatch,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = AssignedTasks::update_many()
            .col_expr(Column::Status, Expr::value(patch.status.to_string()))
            .col_expr(
                Column::CurrentExercises,
                Expr::value(patch.current.exercises_submitted),
            )
            .col_expr(
                Column::CurrentLevels,
                Expr::value(patch.current.levels_completed),
            )
            .col_expr(Column::CurrentHours, Expr::value(patch.current.hours_spent))
            .col_expr(Column::CompletedAt, Expr::value(patch.completed_at))
            .col_expr(Column::LockVersion, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(task_id))
            .filter(Column::LockVersion.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("更新任务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
