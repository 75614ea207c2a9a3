//! 用户练习进度实体

use chrono::{TimeZone, Utc};
use sea_orm::entity::prelude::*;

use crate::models::progress::entities::UserProgressRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub completed: bool,
    pub best_points: i32,
    pub attempts: i32,
    pub last_submitted_at: i64,
    pub xp_granted: bool,
    pub lock_version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> UserProgressRecord {
        UserProgressRecord {
            id: self.id,
            user_id: self.user_id,
            exercise_id: self.exercise_id,
            completed: self.completed,
            best_points: self.best_points,
            attempts: self.attempts,
            last_submitted_at: to_datetime(self.last_submitted_at),
            xp_granted: self.xp_granted,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

pub(crate) fn to_datetime(ts: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}
