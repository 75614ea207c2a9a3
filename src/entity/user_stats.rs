//! 用户聚合统计实体

use sea_orm::entity::prelude::*;

use crate::models::stats::entities::{UserAggregateStats, XpBucket};

use super::user_progress::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub total_xp: i64,
    pub exercises_completed: i32,
    pub levels_completed: i32,
    /// JSON 数组编码的已通关关卡 ID 集合
    #[sea_orm(column_type = "Text")]
    pub completed_level_ids: String,
    pub daily_window_start: i64,
    pub daily_xp: i64,
    pub monthly_window_start: i64,
    pub monthly_xp: i64,
    pub streak_days: i32,
    pub last_active_day: i64,
    pub lock_version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_stats(self) -> UserAggregateStats {
        // 历史数据损坏时退化为空集合，不让单行坏数据拖垮读路径
        let completed_level_ids =
            serde_json::from_str(&self.completed_level_ids).unwrap_or_default();
        UserAggregateStats {
            user_id: self.user_id,
            total_xp: self.total_xp,
            exercises_completed: self.exercises_completed,
            levels_completed: self.levels_completed,
            completed_level_ids,
            daily: XpBucket {
                window_start: self.daily_window_start,
                xp: self.daily_xp,
            },
            monthly: XpBucket {
                window_start: self.monthly_window_start,
                xp: self.monthly_xp,
            },
            streak_days: self.streak_days,
            last_active_day: self.last_active_day,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
