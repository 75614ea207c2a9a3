use super::SeaOrmStorage;
use crate::entity::user_progress::{Column as ProgressColumn, Entity as UserProgress};
use crate::entity::user_stats::{ActiveModel, Column, Entity as UserStats};
use crate::errors::{LearnSystemError, Result};
use crate::models::stats::{entities::UserAggregateStats, responses::LeaderboardScope};
use crate::storage::{LeaderboardRow, Versioned, XpCommitOutcome};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait, UpdateMany,
};

impl SeaOrmStorage {
    /// 获取用户聚合统计
    pub async fn get_stats_impl(
        &self,
        user_id: i64,
    ) -> Result<Option<Versioned<UserAggregateStats>>> {
        let result = UserStats::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("查询统计失败: {e}")))?;

        Ok(result.map(|m| Versioned {
            version: m.lock_version,
            value: m.into_stats(),
        }))
    }

    /// 单事务内完成一次 XP 入账
    ///
    /// 先以 xp_granted = false 为条件置位进度行的领取标记，再写入
    /// 统计行，两步在同一事务里提交：统计写入失败时标记随之回滚，
    /// 欠账保留在待入账列表里，不存在标记已置位而 XP 丢失的窗口。
    pub async fn commit_xp_award_impl(
        &self,
        record_id: i64,
        stats: &UserAggregateStats,
        expected_version: Option<i64>,
    ) -> Result<XpCommitOutcome> {
        let now = chrono::Utc::now().timestamp();
        let completed_level_ids = serde_json::to_string(&stats.completed_level_ids)?;

        // 出错提前返回时未提交的事务在 drop 处回滚
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("开启入账事务失败: {e}")))?;

        let claimed = UserProgress::update_many()
            .col_expr(ProgressColumn::XpGranted, Expr::value(true))
            .col_expr(ProgressColumn::UpdatedAt, Expr::value(now))
            .filter(ProgressColumn::Id.eq(record_id))
            .filter(ProgressColumn::XpGranted.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| {
                LearnSystemError::database_operation(format!("更新 XP 入账标记失败: {e}"))
            })?;
        if claimed.rows_affected == 0 {
            txn.rollback().await.map_err(|e| {
                LearnSystemError::database_operation(format!("回滚入账事务失败: {e}"))
            })?;
            return Ok(XpCommitOutcome::AlreadyGranted);
        }

        let written = match expected_version {
            // 首建统计行，并发首建撞主键按冲突处理
            None => match Self::stats_model(stats, completed_level_ids, now)
                .insert(&txn)
                .await
            {
                Ok(_) => true,
                Err(e) if Self::is_unique_violation(&e) => false,
                Err(e) => {
                    return Err(LearnSystemError::database_operation(format!(
                        "创建统计失败: {e}"
                    )));
                }
            },
            Some(version) => {
                Self::guarded_stats_update(stats, completed_level_ids, version, now)
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        LearnSystemError::database_operation(format!("更新统计失败: {e}"))
                    })?
                    .rows_affected
                    > 0
            }
        };
        if !written {
            txn.rollback().await.map_err(|e| {
                LearnSystemError::database_operation(format!("回滚入账事务失败: {e}"))
            })?;
            return Ok(XpCommitOutcome::Conflict);
        }

        txn.commit()
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("提交入账事务失败: {e}")))?;
        Ok(XpCommitOutcome::Committed)
    }

    fn stats_model(stats: &UserAggregateStats, completed_level_ids: String, now: i64) -> ActiveModel {
        ActiveModel {
            user_id: Set(stats.user_id),
            total_xp: Set(stats.total_xp),
            exercises_completed: Set(stats.exercises_completed),
            levels_completed: Set(stats.levels_completed),
            completed_level_ids: Set(completed_level_ids),
            daily_window_start: Set(stats.daily.window_start),
            daily_xp: Set(stats.daily.xp),
            monthly_window_start: Set(stats.monthly.window_start),
            monthly_xp: Set(stats.monthly.xp),
            streak_days: Set(stats.streak_days),
            last_active_day: Set(stats.last_active_day),
            lock_version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    fn guarded_stats_update(
        stats: &UserAggregateStats,
        completed_level_ids: String,
        expected_version: i64,
        now: i64,
    ) -> UpdateMany<UserStats> {
        UserStats::update_many()
            .col_expr(Column::TotalXp, Expr::value(stats.total_xp))
            .col_expr(
                Column::ExercisesCompleted,
                Expr::value(stats.exercises_completed),
            )
            .col_expr(Column::LevelsCompleted, Expr::value(stats.levels_completed))
            .col_expr(Column::CompletedLevelIds, Expr::value(completed_level_ids))
            .col_expr(
                Column::DailyWindowStart,
                Expr::value(stats.daily.window_start),
            )
            .col_expr(Column::DailyXp, Expr::value(stats.daily.xp))
            .col_expr(
                Column::MonthlyWindowStart,
                Expr::value(stats.monthly.window_start),
            )
            .col_expr(Column::MonthlyXp, Expr::value(stats.monthly.xp))
            .col_expr(Column::StreakDays, Expr::value(stats.streak_days))
            .col_expr(Column::LastActiveDay, Expr::value(stats.last_active_day))
            .col_expr(Column::LockVersion, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::UserId.eq(stats.user_id))
            .filter(Column::LockVersion.eq(expected_version))
    }

    /// 排行榜查询（读时排序）
    ///
    /// daily/monthly 只统计窗口起点等于当前窗口的行；窗口翻转是惰性的，
    /// 停留在旧窗口的行本轮 XP 实为 0，过滤掉即可。
    pub async fn list_leaderboard_impl(
        &self,
        scope: LeaderboardScope,
        window_start: i64,
        limit: u64,
    ) -> Result<Vec<LeaderboardRow>> {
        let mut select = UserStats::find();

        let xp_column = match scope {
            LeaderboardScope::Total => Column::TotalXp,
            LeaderboardScope::Daily => {
                select = select.filter(Column::DailyWindowStart.eq(window_start));
                Column::DailyXp
            }
            LeaderboardScope::Monthly => {
                select = select.filter(Column::MonthlyWindowStart.eq(window_start));
                Column::MonthlyXp
            }
        };

        let rows = select
            .filter(xp_column.gt(0))
            .order_by_desc(xp_column)
            // 并列时 user_id 小者在前，保证排序稳定
            .order_by_asc(Column::UserId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("查询排行榜失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|m| LeaderboardRow {
                user_id: m.user_id,
                xp: match scope {
                    LeaderboardScope::Total => m.total_xp,
                    LeaderboardScope::Daily => m.daily_xp,
                    LeaderboardScope::Monthly => m.monthly_xp,
                },
            })
            .collect())
    }
}
