//! 用户徽章实体

use sea_orm::entity::prelude::*;

use crate::models::badges::entities::AwardedBadge;

use super::user_progress::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_badges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub badge_id: String,
    pub awarded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_awarded(self) -> AwardedBadge {
        AwardedBadge {
            badge_id: self.badge_id,
            awarded_at: to_datetime(self.awarded_at),
        }
    }
}
