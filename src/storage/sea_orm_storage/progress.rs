use super::SeaOrmStorage;
use crate::entity::user_progress::{ActiveModel, Column, Entity as UserProgress};
use crate::errors::{LearnSystemError, Result};
use crate::models::progress::entities::UserProgressRecord;
use crate::storage::{NewProgress, ProgressPatch, Versioned};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 获取某 (user, exercise) 对的进度
    pub async fn get_progress_impl(
        &self,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<Option<Versioned<UserProgressRecord>>> {
        let result = UserProgress::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ExerciseId.eq(exercise_id))
            .one(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("查询进度失败: {e}")))?;

        Ok(result.map(|m| Versioned {
            version: m.lock_version,
            value: m.into_record(),
        }))
    }

    /// 列出用户全部进度
    pub async fn list_progress_by_user_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserProgressRecord>> {
        let rows = UserProgress::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::ExerciseId)
            .all(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("查询进度列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_record()).collect())
    }

    /// 新建进度行
    ///
    /// (user, exercise) 唯一索引兜底并发的首次提交，撞索引返回 None，
    /// 调用方转为读取-更新路径重试。
    pub async fn insert_progress_impl(
        &self,
        fresh: NewProgress,
    ) -> Result<Option<UserProgressRecord>> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(fresh.user_id),
            exercise_id: Set(fresh.exercise_id),
            completed: Set(fresh.completed),
            best_points: Set(fresh.best_points),
            attempts: Set(1),
            last_submitted_at: Set(fresh.last_submitted_at),
            xp_granted: Set(false),
            lock_version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok(Some(result.into_record())),
            Err(e) if Self::is_unique_violation(&e) => Ok(None),
            Err(e) => Err(LearnSystemError::database_operation(format!(
                "创建进度失败: {e}"
            ))),
        }
    }

    /// CAS 更新进度行
    pub async fn update_progress_guarded_impl(
        &self,
        id: i64,
        expected_version: i64,
        patch: ProgressPatch,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = UserProgress::update_many()
            .col_expr(Column::Completed, Expr::value(patch.completed))
            .col_expr(Column::BestPoints, Expr::value(patch.best_points))
            .col_expr(Column::Attempts, Expr::value(patch.attempts))
            .col_expr(
                Column::LastSubmittedAt,
                Expr::value(patch.last_submitted_at),
            )
            .col_expr(Column::LockVersion, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::LockVersion.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("更新进度失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出已完成但 XP 尚未入账的进度行
    pub async fn list_pending_awards_impl(&self, user_id: i64) -> Result<Vec<UserProgressRecord>> {
        let rows = UserProgress::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Completed.eq(true))
            .filter(Column::XpGranted.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| {
                LearnSystemError::database_operation(format!("查询待入账进度失败: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_record()).collect())
    }
}
